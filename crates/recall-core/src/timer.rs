//! Cancellable periodic timers.
//!
//! Every delayed action owns exactly one [`TimerHandle`]. The handle wraps
//! a tokio task that waits one period, runs the tick callback, and repeats
//! until the callback breaks. Releasing or dropping the handle aborts the
//! task, so a handle can never outlive the action that owns it.
//!
//! [`TimerGauge`] counts live handles. Teardown correctness is checked
//! against it: after shutdown the gauge must read zero.

use std::future::Future;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Counts timer handles that have not been released yet.
#[derive(Debug, Clone, Default)]
pub struct TimerGauge {
    live: Arc<AtomicUsize>,
}

impl TimerGauge {
    /// A gauge reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live handles.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    fn lease(&self) -> TimerLease {
        self.live.fetch_add(1, Ordering::AcqRel);
        TimerLease {
            live: Arc::clone(&self.live),
        }
    }
}

/// One unit of a [`TimerGauge`], returned on drop.
#[derive(Debug)]
struct TimerLease {
    live: Arc<AtomicUsize>,
}

impl Drop for TimerLease {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Exclusive handle to a running periodic timer.
pub struct TimerHandle {
    task: JoinHandle<()>,
    _lease: TimerLease,
}

impl TimerHandle {
    /// Stop the timer. No tick starts after this returns.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl core::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("task", &self.task.id())
            .finish_non_exhaustive()
    }
}

/// Start a timer that calls `tick` every `period`, first one period from
/// now, until `tick` returns [`ControlFlow::Break`] or the handle is
/// released.
///
/// Must be called from within a tokio runtime.
pub fn start_periodic<F, Fut>(period: Duration, gauge: &TimerGauge, mut tick: F) -> TimerHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ControlFlow<()>> + Send + 'static,
{
    let period = period.max(Duration::from_millis(1));
    let lease = gauge.lease();
    let task = tokio::spawn(async move {
        let now = Instant::now();
        let first = now.checked_add(period).unwrap_or(now);
        let mut interval = tokio::time::interval_at(first, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if tick().await.is_break() {
                break;
            }
        }
    });
    TimerHandle {
        task,
        _lease: lease,
    }
}
