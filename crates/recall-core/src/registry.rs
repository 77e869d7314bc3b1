//! The action registry: at most one in-flight delayed action per actor.
//!
//! The registry is a sharded concurrent map keyed by [`ActorId`].
//! Operations on one actor never wait on operations for another. The
//! registry itself never releases timers: [`ActionRegistry::cancel`] and
//! [`ActionRegistry::teardown`] hand the removed actions back, and the
//! caller releases their timers.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use recall_types::{ActionId, ActorId, ItemKind, Position};

use crate::timer::TimerHandle;

/// Read-only view of a delayed action, without its timer.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSnapshot {
    /// Identity of this countdown run.
    pub id: ActionId,
    /// The actor counting down.
    pub actor: ActorId,
    /// Where the actor goes when the countdown completes.
    pub destination: Position,
    /// Where the actor stood when the countdown started.
    pub anchor: Position,
    /// Progress ticks left before completion.
    pub remaining_ticks: u32,
    /// Item that must stay held and is consumed on completion.
    pub required_item: ItemKind,
    /// Wall-clock start time.
    pub started_at: DateTime<Utc>,
}

/// One in-flight countdown. Owns its timer.
#[derive(Debug)]
pub struct DelayedAction {
    state: ActionSnapshot,
    timer: TimerHandle,
}

impl DelayedAction {
    /// Bundle countdown state with the timer that drives it.
    pub const fn new(state: ActionSnapshot, timer: TimerHandle) -> Self {
        Self { state, timer }
    }

    /// The countdown state.
    pub const fn state(&self) -> &ActionSnapshot {
        &self.state
    }

    /// Release the timer and keep the final state.
    pub fn release(self) -> ActionSnapshot {
        self.timer.release();
        self.state
    }
}

/// Process-wide map from actor to in-flight action, scoped to one scheduler.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: DashMap<ActorId, DelayedAction>,
}

impl ActionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `action` unless its actor already has one in flight.
    ///
    /// On conflict the action is handed back untouched so the caller can
    /// release its timer; the existing action is never replaced.
    pub fn try_start(&self, action: DelayedAction) -> Result<(), DelayedAction> {
        match self.actions.entry(action.state.actor) {
            Entry::Occupied(_) => Err(action),
            Entry::Vacant(slot) => {
                slot.insert(action);
                Ok(())
            }
        }
    }

    /// Remove and return the actor's action, if any.
    pub fn cancel(&self, actor: ActorId) -> Option<DelayedAction> {
        self.actions.remove(&actor).map(|(_, action)| action)
    }

    /// Snapshot of the actor's action, if any.
    pub fn get(&self, actor: ActorId) -> Option<ActionSnapshot> {
        self.actions.get(&actor).map(|entry| entry.state.clone())
    }

    /// Mutate the actor's action in place. Returns `None` when nothing is
    /// in flight.
    pub fn update<R>(&self, actor: ActorId, f: impl FnOnce(&mut ActionSnapshot) -> R) -> Option<R> {
        self.actions
            .get_mut(&actor)
            .map(|mut entry| f(&mut entry.state))
    }

    /// Actors with an action in flight.
    pub fn actors(&self) -> Vec<ActorId> {
        self.actions.iter().map(|entry| *entry.key()).collect()
    }

    /// Remove and return every action.
    pub fn teardown(&self) -> Vec<DelayedAction> {
        self.actors()
            .into_iter()
            .filter_map(|actor| self.cancel(actor))
            .collect()
    }

    /// Number of actions in flight.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no action is in flight.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
