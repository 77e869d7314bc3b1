//! Plugin lifecycle: wire the scheduler to the host on enable, tear it
//! down on disable.

use std::sync::Arc;

use tracing::{error, info};

use crate::arena::Services;
use crate::config::RecallConfig;
use crate::error::RecallError;
use crate::listener::RecallListener;
use crate::scheduler::{Collaborators, DelayedActionScheduler};
use crate::world::{ActorWorld, Inventory};

/// An enabled countdown teleport.
#[derive(Debug)]
pub struct RecallPlugin {
    scheduler: DelayedActionScheduler,
    listener: RecallListener,
}

impl RecallPlugin {
    /// Resolve the arena adapter and build the scheduler and listener.
    ///
    /// # Errors
    ///
    /// Returns [`RecallError::AdapterUnavailable`] if no arena adapter was
    /// registered in `services`.
    pub fn enable(
        config: &RecallConfig,
        world: Arc<dyn ActorWorld>,
        inventory: Arc<dyn Inventory>,
        services: &Services,
    ) -> Result<Self, RecallError> {
        let arena = services.arena().inspect_err(|err| {
            error!(error = %err, "arena adapter not registered, plugin not enabled");
        })?;

        let scheduler = DelayedActionScheduler::new(
            config,
            Collaborators {
                world,
                inventory,
                arena,
            },
        );
        let listener = RecallListener::new(scheduler.clone(), config);

        info!(
            total_ticks = config.countdown.total_ticks,
            tick_interval_ms = config.countdown.tick_interval_ms,
            required_item = %config.item.required_item,
            "recall plugin enabled"
        );
        Ok(Self {
            scheduler,
            listener,
        })
    }

    /// The listener the host routes interact and move notifications to.
    pub const fn listener(&self) -> &RecallListener {
        &self.listener
    }

    /// The underlying scheduler.
    pub const fn scheduler(&self) -> &DelayedActionScheduler {
        &self.scheduler
    }

    /// Cancel every countdown. Returns how many were cancelled.
    pub async fn disable(self) -> usize {
        let cancelled = self.scheduler.shutdown().await;
        info!(cancelled, "recall plugin disabled");
        cancelled
    }
}
