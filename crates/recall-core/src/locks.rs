//! Per-actor mutual exclusion.
//!
//! Tick callbacks, movement notifications and manual cancellations for the
//! same actor must not interleave inside one state transition. Each actor
//! gets its own async mutex, created on first use and forgotten once
//! nobody holds or waits on it.

use std::sync::Arc;

use dashmap::DashMap;
use recall_types::ActorId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock table keyed by actor.
#[derive(Debug, Default)]
pub struct ActorLocks {
    locks: DashMap<ActorId, Arc<Mutex<()>>>,
}

impl ActorLocks {
    /// An empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `actor`.
    pub async fn lock(&self, actor: ActorId) -> OwnedMutexGuard<()> {
        let lock = Arc::clone(&*self.locks.entry(actor).or_default());
        lock.lock_owned().await
    }

    /// Drop the actor's lock if nobody holds or waits on it.
    pub fn forget_if_idle(&self, actor: ActorId) {
        self.locks
            .remove_if(&actor, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Actors that currently have a lock entry (held, awaited or idle).
    pub fn actors(&self) -> Vec<ActorId> {
        self.locks.iter().map(|entry| *entry.key()).collect()
    }

    /// Number of lock entries.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
