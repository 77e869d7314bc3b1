//! Translates inbound host notifications into scheduler calls.

use recall_types::{InteractEvent, ItemKind, MoveEvent};
use tracing::{debug, warn};

use crate::config::{MessagesConfig, RecallConfig};
use crate::error::RecallError;
use crate::registry::ActionSnapshot;
use crate::scheduler::DelayedActionScheduler;

/// What an interact notification led to.
#[derive(Debug)]
pub enum InteractOutcome {
    /// Not a trigger: wrong click or wrong item.
    Ignored,
    /// A countdown started.
    Started(ActionSnapshot),
    /// The trigger was valid but the start was refused. The actor has
    /// already been told why.
    Rejected(RecallError),
}

/// Routes interact and move notifications to a [`DelayedActionScheduler`].
#[derive(Debug, Clone)]
pub struct RecallListener {
    scheduler: DelayedActionScheduler,
    required_item: ItemKind,
    require_right_click: bool,
    messages: MessagesConfig,
}

impl RecallListener {
    /// Build a listener for `scheduler` using the trigger settings in `config`.
    pub fn new(scheduler: DelayedActionScheduler, config: &RecallConfig) -> Self {
        Self {
            scheduler,
            required_item: config.item.required_kind(),
            require_right_click: config.item.require_right_click,
            messages: config.messages.clone(),
        }
    }

    /// Handle an actor using an item.
    pub async fn on_interact(&self, event: &InteractEvent) -> InteractOutcome {
        if self.require_right_click && !event.click.is_right_click() {
            return InteractOutcome::Ignored;
        }
        if event.item.as_ref() != Some(&self.required_item) {
            return InteractOutcome::Ignored;
        }

        let actor = event.actor;
        match self.scheduler.start(actor, self.required_item.clone()).await {
            Ok(state) => InteractOutcome::Started(state),
            Err(error) => {
                let message = match &error {
                    RecallError::IneligibleActor { .. } => &self.messages.not_in_game,
                    RecallError::NoDestination { .. } => &self.messages.no_destination,
                    RecallError::ItemNotHeld { .. } => &self.messages.item_required,
                    RecallError::AlreadyInFlight { .. }
                    | RecallError::ShuttingDown
                    | RecallError::AdapterUnavailable { .. }
                    | RecallError::Host { .. } => {
                        warn!(%actor, %error, "countdown could not start");
                        &self.messages.unavailable
                    }
                };
                debug!(%actor, %error, "interact rejected");
                self.scheduler.notify(actor, message);
                InteractOutcome::Rejected(error)
            }
        }
    }

    /// Handle an actor moving. Turning in place is ignored. Returns the
    /// countdown the move cancelled, if any.
    pub async fn on_move(&self, event: &MoveEvent) -> Option<ActionSnapshot> {
        if event.is_turn_only() {
            return None;
        }
        self.scheduler
            .on_external_move(event.actor, event.to.position)
            .await
    }

    /// The scheduler this listener drives.
    pub const fn scheduler(&self) -> &DelayedActionScheduler {
        &self.scheduler
    }
}
