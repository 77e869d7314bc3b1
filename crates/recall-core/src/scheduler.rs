//! The delayed action scheduler.
//!
//! Each actor can have one countdown in flight. A countdown is started by
//! [`DelayedActionScheduler::start`], advanced by its own periodic timer,
//! and ends in exactly one terminal state:
//!
//! ```text
//! Idle --start--> InFlight --tick (remaining == 0)--> Completed
//!                    |
//!                    +--moved / item gone / cancel / shutdown--> Cancelled
//! ```
//!
//! Every transition runs under the actor's lock from [`ActorLocks`], so a
//! tick, a movement notification and a manual cancel for the same actor
//! never interleave. Each timer is bound to the [`ActionId`] it was armed
//! for; a tick that finds a different (or no) action in the registry does
//! nothing. Together with the lock this means no tick acts on an action
//! once [`DelayedActionScheduler::cancel`] has returned.
//!
//! Per tick, in order:
//!
//! 1. remaining ticks at zero: teleport, consume one required item,
//!    remove the action, release the timer, notify success;
//! 2. position differs from the anchor on any axis: cancel (`Moved`);
//! 3. required item no longer held: cancel (`ItemNoLongerHeld`);
//! 4. otherwise: notify the remaining count and decrement it.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use recall_types::{ActionId, ActorId, ItemKind, Position};
use tracing::{debug, info, warn};

use crate::arena::ArenaService;
use crate::config::{MessagesConfig, RecallConfig};
use crate::error::RecallError;
use crate::locks::ActorLocks;
use crate::registry::{ActionRegistry, ActionSnapshot, DelayedAction};
use crate::timer::{TimerGauge, TimerHandle, start_periodic};
use crate::world::{self, ActorWorld, Inventory, ItemRemoval};

/// Why a countdown was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The actor left the anchor position.
    Moved,
    /// The actor no longer holds the required item.
    ItemNoLongerHeld,
    /// The actor started a new countdown.
    Retriggered,
    /// Cancelled on request.
    Manual,
    /// The scheduler is shutting down.
    Shutdown,
    /// A host query failed mid-countdown.
    HostFailure,
}

/// How a countdown that reached zero ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The actor was teleported; `removal` says where the item came from.
    Teleported {
        /// Which stack gave up the required item.
        removal: ItemRemoval,
    },
    /// The host refused the teleport. The action was dropped, not retried.
    TeleportFailed,
}

/// Result of one tick callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still in flight.
    Progressed {
        /// Ticks left after this one.
        remaining: u32,
    },
    /// Reached the terminal completed state.
    Completed(Completion),
    /// Reached the terminal cancelled state.
    Cancelled(CancelReason),
    /// The timer's action is gone or was replaced; nothing happened.
    Stale,
}

impl TickOutcome {
    /// Whether the timer that produced this outcome should stop.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Progressed { .. })
    }
}

/// The host capabilities the scheduler drives.
#[derive(Clone)]
pub struct Collaborators {
    /// Positions, teleports and messages.
    pub world: Arc<dyn ActorWorld>,
    /// Held items.
    pub inventory: Arc<dyn Inventory>,
    /// Eligibility and destinations.
    pub arena: Arc<dyn ArenaService>,
}

impl core::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Countdown parameters taken from [`RecallConfig`].
#[derive(Debug, Clone)]
struct Settings {
    total_ticks: u32,
    interval: Duration,
    messages: MessagesConfig,
}

/// State shared between the scheduler handle and its timers.
#[derive(Debug)]
struct Shared {
    settings: Settings,
    host: Collaborators,
    registry: ActionRegistry,
    locks: ActorLocks,
    timers: TimerGauge,
    closing: AtomicBool,
}

/// Drives one countdown per actor.
///
/// Cheap to clone; clones share the same registry. Timers only hold a weak
/// reference, so dropping every handle also stops every timer.
#[derive(Debug, Clone)]
pub struct DelayedActionScheduler {
    shared: Arc<Shared>,
}

impl DelayedActionScheduler {
    /// Create a scheduler with an empty registry.
    pub fn new(config: &RecallConfig, host: Collaborators) -> Self {
        let settings = Settings {
            total_ticks: config.countdown.total_ticks,
            interval: config.countdown.interval(),
            messages: config.messages.clone(),
        };
        Self {
            shared: Arc::new(Shared {
                settings,
                host,
                registry: ActionRegistry::new(),
                locks: ActorLocks::new(),
                timers: TimerGauge::new(),
                closing: AtomicBool::new(false),
            }),
        }
    }

    /// Start a countdown to the actor's destination.
    ///
    /// Once the actor is found eligible, any countdown already in flight
    /// is cancelled (and its actor told so) before the remaining checks
    /// run. A start that fails after that point leaves nothing in flight.
    ///
    /// # Errors
    ///
    /// [`RecallError::IneligibleActor`], [`RecallError::NoDestination`],
    /// [`RecallError::ItemNotHeld`], [`RecallError::ShuttingDown`], or
    /// [`RecallError::Host`] when a collaborator query fails.
    pub async fn start(
        &self,
        actor: ActorId,
        required_item: ItemKind,
    ) -> Result<ActionSnapshot, RecallError> {
        let started = {
            let _guard = self.shared.locks.lock(actor).await;
            self.start_locked(actor, required_item)
        };
        self.shared.locks.forget_if_idle(actor);
        started
    }

    fn start_locked(
        &self,
        actor: ActorId,
        required_item: ItemKind,
    ) -> Result<ActionSnapshot, RecallError> {
        let shared = &self.shared;

        if shared.closing.load(Ordering::Acquire) {
            return Err(RecallError::ShuttingDown);
        }
        if !shared.host.arena.is_eligible(actor)? {
            return Err(RecallError::IneligibleActor { actor });
        }

        shared.cancel_locked(actor, CancelReason::Retriggered);

        let destination = shared
            .host
            .arena
            .resolve_destination(actor)?
            .ok_or(RecallError::NoDestination { actor })?;
        if shared.host.inventory.held_item_count(actor, &required_item)? == 0 {
            return Err(RecallError::ItemNotHeld { actor });
        }
        let anchor = shared.host.world.location(actor)?.position;

        let state = ActionSnapshot {
            id: ActionId::new(),
            actor,
            destination,
            anchor,
            remaining_ticks: shared.settings.total_ticks,
            required_item,
            started_at: Utc::now(),
        };
        let timer = self.arm_timer(actor, state.id);
        if let Err(rejected) = shared.registry.try_start(DelayedAction::new(state.clone(), timer)) {
            // Cannot happen while the actor lock is held.
            let _ = rejected.release();
            warn!(%actor, "registry already held an action after cancel");
            return Err(RecallError::AlreadyInFlight { actor });
        }

        shared.notify(
            actor,
            &MessagesConfig::render(&shared.settings.messages.started, state.remaining_ticks),
        );
        info!(
            %actor,
            action = %state.id,
            %destination,
            %anchor,
            total_ticks = state.remaining_ticks,
            "countdown started"
        );
        Ok(state)
    }

    /// Run one tick of the actor's countdown, as its timer would.
    pub async fn on_tick(&self, actor: ActorId, action: ActionId) -> TickOutcome {
        self.shared.on_tick(actor, action).await
    }

    /// React to a movement notification.
    ///
    /// Cancels at once when `to` differs from the anchor on any axis,
    /// without waiting for the next tick. Returns the cancelled action.
    pub async fn on_external_move(&self, actor: ActorId, to: Position) -> Option<ActionSnapshot> {
        let shared = &self.shared;
        // Most movement comes from actors with nothing in flight.
        if shared.registry.get(actor).is_none() {
            return None;
        }

        let cancelled = {
            let _guard = shared.locks.lock(actor).await;
            match shared.registry.get(actor) {
                Some(state) if to.differs_from(&state.anchor) => {
                    shared.cancel_locked(actor, CancelReason::Moved)
                }
                _ => None,
            }
        };
        if cancelled.is_some() {
            shared.locks.forget_if_idle(actor);
        }
        cancelled
    }

    /// Cancel the actor's countdown. `None` means there was nothing to
    /// cancel. The timer is released before this returns.
    pub async fn cancel(&self, actor: ActorId, reason: CancelReason) -> Option<ActionSnapshot> {
        let shared = &self.shared;
        let cancelled = {
            let _guard = shared.locks.lock(actor).await;
            shared.cancel_locked(actor, reason)
        };
        shared.locks.forget_if_idle(actor);
        cancelled
    }

    /// Cancel every countdown and refuse new ones. Returns how many
    /// countdowns were cancelled.
    pub async fn shutdown(&self) -> usize {
        let shared = &self.shared;
        shared.closing.store(true, Ordering::Release);

        // Lock entries cover starts that are still in progress.
        let mut actors = shared.locks.actors();
        actors.extend(shared.registry.actors());
        actors.sort_unstable();
        actors.dedup();

        let mut cancelled: usize = 0;
        for actor in actors {
            let _guard = shared.locks.lock(actor).await;
            if shared.cancel_locked(actor, CancelReason::Shutdown).is_some() {
                cancelled = cancelled.saturating_add(1);
            }
        }
        for action in shared.registry.teardown() {
            let state = action.release();
            shared.notify(state.actor, &shared.settings.messages.cancelled);
            cancelled = cancelled.saturating_add(1);
        }
        for actor in shared.locks.actors() {
            shared.locks.forget_if_idle(actor);
        }

        info!(
            cancelled,
            live_timers = shared.timers.live(),
            "scheduler shut down"
        );
        cancelled
    }

    /// Snapshot of the actor's countdown, if one is in flight.
    pub fn snapshot(&self, actor: ActorId) -> Option<ActionSnapshot> {
        self.shared.registry.get(actor)
    }

    /// Number of countdowns in flight.
    pub fn in_flight(&self) -> usize {
        self.shared.registry.len()
    }

    /// Number of timers not yet released.
    pub fn live_timers(&self) -> usize {
        self.shared.timers.live()
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shutting_down(&self) -> bool {
        self.shared.closing.load(Ordering::Acquire)
    }

    /// Send a message to the actor. Failures are logged, never returned.
    pub fn notify(&self, actor: ActorId, message: &str) {
        self.shared.notify(actor, message);
    }

    /// Arm the periodic timer for one action. The timer holds only a weak
    /// scheduler reference plus the actor and action ids.
    fn arm_timer(&self, actor: ActorId, action: ActionId) -> TimerHandle {
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        start_periodic(self.shared.settings.interval, &self.shared.timers, move || {
            let weak = Weak::clone(&weak);
            async move {
                let Some(shared) = weak.upgrade() else {
                    return ControlFlow::Break(());
                };
                if shared.on_tick(actor, action).await.is_terminal() {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }
        })
    }
}

impl Shared {
    async fn on_tick(&self, actor: ActorId, action: ActionId) -> TickOutcome {
        let outcome = {
            let _guard = self.locks.lock(actor).await;
            self.tick_locked(actor, action)
        };
        if outcome.is_terminal() {
            self.locks.forget_if_idle(actor);
        }
        outcome
    }

    fn tick_locked(&self, actor: ActorId, action: ActionId) -> TickOutcome {
        let Some(state) = self.registry.get(actor).filter(|state| state.id == action) else {
            debug!(%actor, %action, "stale tick ignored");
            return TickOutcome::Stale;
        };

        if state.remaining_ticks == 0 {
            return TickOutcome::Completed(self.complete_locked(&state));
        }

        let position = match self.host.world.location(actor) {
            Ok(location) => location.position,
            Err(error) => {
                warn!(%actor, %error, "position query failed, cancelling countdown");
                return self.cancel_tick(actor, CancelReason::HostFailure);
            }
        };
        if position.differs_from(&state.anchor) {
            return self.cancel_tick(actor, CancelReason::Moved);
        }

        match self.host.inventory.held_item_count(actor, &state.required_item) {
            Ok(0) => return self.cancel_tick(actor, CancelReason::ItemNoLongerHeld),
            Ok(_) => {}
            Err(error) => {
                warn!(%actor, %error, "inventory query failed, cancelling countdown");
                return self.cancel_tick(actor, CancelReason::HostFailure);
            }
        }

        self.notify(
            actor,
            &MessagesConfig::render(&self.settings.messages.countdown, state.remaining_ticks),
        );
        let remaining = self
            .registry
            .update(actor, |state| {
                state.remaining_ticks = state.remaining_ticks.saturating_sub(1);
                state.remaining_ticks
            })
            .unwrap_or(0);
        debug!(%actor, %action, remaining, "countdown ticked");
        TickOutcome::Progressed { remaining }
    }

    fn cancel_tick(&self, actor: ActorId, reason: CancelReason) -> TickOutcome {
        self.cancel_locked(actor, reason);
        TickOutcome::Cancelled(reason)
    }

    /// Teleport, consume the item, then retire the action. The teleport is
    /// not gated on finding the item: presence was checked every tick.
    fn complete_locked(&self, state: &ActionSnapshot) -> Completion {
        let actor = state.actor;

        if let Err(error) = self.host.world.teleport(actor, state.destination) {
            warn!(%actor, action = %state.id, %error, "teleport failed, countdown dropped");
            if let Some(action) = self.registry.cancel(actor) {
                let _ = action.release();
            }
            self.notify(actor, &self.settings.messages.failed);
            return Completion::TeleportFailed;
        }

        let removal =
            match world::consume_one(self.host.inventory.as_ref(), actor, &state.required_item) {
                Ok(ItemRemoval::NotFound) => {
                    warn!(
                        %actor,
                        item = %state.required_item,
                        "required item not found after teleport"
                    );
                    ItemRemoval::NotFound
                }
                Ok(removal) => removal,
                Err(error) => {
                    warn!(%actor, %error, "failed to consume required item");
                    ItemRemoval::NotFound
                }
            };

        if let Some(action) = self.registry.cancel(actor) {
            let _ = action.release();
        }
        self.notify(actor, &self.settings.messages.completed);
        info!(
            %actor,
            action = %state.id,
            destination = %state.destination,
            ?removal,
            elapsed_ms = elapsed_ms(state),
            "countdown completed"
        );
        Completion::Teleported { removal }
    }

    /// Remove the actor's action, release its timer and tell the actor.
    /// Caller holds the actor lock.
    fn cancel_locked(&self, actor: ActorId, reason: CancelReason) -> Option<ActionSnapshot> {
        let state = self.registry.cancel(actor)?.release();

        let messages = &self.settings.messages;
        let message = match reason {
            CancelReason::Moved => &messages.cancelled_moved,
            CancelReason::ItemNoLongerHeld => &messages.cancelled_item,
            CancelReason::HostFailure => &messages.failed,
            CancelReason::Retriggered | CancelReason::Manual | CancelReason::Shutdown => {
                &messages.cancelled
            }
        };
        self.notify(actor, message);
        info!(
            %actor,
            action = %state.id,
            ?reason,
            remaining_ticks = state.remaining_ticks,
            elapsed_ms = elapsed_ms(&state),
            "countdown cancelled"
        );
        Some(state)
    }

    fn notify(&self, actor: ActorId, message: &str) {
        if let Err(error) = self.host.world.notify(actor, message) {
            warn!(%actor, %error, "failed to notify actor");
        }
    }
}

/// Wall-clock milliseconds since the countdown started.
fn elapsed_ms(state: &ActionSnapshot) -> i64 {
    Utc::now()
        .signed_duration_since(state.started_at)
        .num_milliseconds()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use recall_types::ItemStack;

    use super::*;
    use crate::arena::StaticArena;
    use crate::world::MemoryWorld;

    const SPAWN: Position = Position::new(0.0, 80.0, 0.0);
    const STAND: Position = Position::new(25.5, 64.0, -12.5);

    struct Fixture {
        world: Arc<MemoryWorld>,
        arena: Arc<StaticArena>,
        scheduler: DelayedActionScheduler,
    }

    fn paper() -> ItemKind {
        ItemKind::from("paper")
    }

    fn fixture() -> Fixture {
        let world = Arc::new(MemoryWorld::new());
        let arena = Arc::new(StaticArena::new());
        arena.add_team("red", Some(SPAWN));
        let scheduler = DelayedActionScheduler::new(
            &RecallConfig::default(),
            Collaborators {
                world: Arc::clone(&world) as Arc<dyn ActorWorld>,
                inventory: Arc::clone(&world) as Arc<dyn Inventory>,
                arena: Arc::clone(&arena) as Arc<dyn ArenaService>,
            },
        );
        Fixture {
            world,
            arena,
            scheduler,
        }
    }

    fn player(fx: &Fixture, papers: u32) -> ActorId {
        let actor = ActorId::new();
        fx.world.spawn(actor, STAND);
        if papers > 0 {
            fx.world.give(actor, 0, ItemStack::new(paper(), papers)).unwrap();
        }
        fx.arena.join(actor, "red");
        actor
    }

    #[tokio::test]
    async fn ineligible_actor_is_rejected_without_side_effects() {
        let fx = fixture();
        let actor = player(&fx, 1);
        fx.arena.leave(actor);

        let result = fx.scheduler.start(actor, paper()).await;
        assert!(matches!(result, Err(RecallError::IneligibleActor { .. })));
        assert_eq!(fx.scheduler.in_flight(), 0);
        assert_eq!(fx.scheduler.live_timers(), 0);
        assert!(fx.world.messages(actor).is_empty());
    }

    #[tokio::test]
    async fn missing_destination_is_rejected() {
        let fx = fixture();
        let actor = player(&fx, 1);
        fx.arena.add_team("red", None);

        let result = fx.scheduler.start(actor, paper()).await;
        assert!(matches!(result, Err(RecallError::NoDestination { .. })));
        assert_eq!(fx.scheduler.in_flight(), 0);
    }

    #[tokio::test]
    async fn start_requires_the_item() {
        let fx = fixture();
        let actor = player(&fx, 0);

        let result = fx.scheduler.start(actor, paper()).await;
        assert!(matches!(result, Err(RecallError::ItemNotHeld { .. })));
    }

    #[tokio::test]
    async fn start_anchors_at_current_position() {
        let fx = fixture();
        let actor = player(&fx, 1);

        let state = fx.scheduler.start(actor, paper()).await.unwrap();
        assert_eq!(state.anchor, STAND);
        assert_eq!(state.destination, SPAWN);
        assert_eq!(state.remaining_ticks, 5);
        assert_eq!(fx.scheduler.snapshot(actor), Some(state));
        assert_eq!(fx.scheduler.live_timers(), 1);
        assert_eq!(
            fx.world.messages(actor),
            vec!["Teleporting to your team spawn in 5 seconds, do not move...".to_owned()]
        );
    }

    #[tokio::test]
    async fn manual_ticks_count_down_then_complete() {
        let fx = fixture();
        let actor = player(&fx, 2);
        let state = fx.scheduler.start(actor, paper()).await.unwrap();

        for expected in (0..5).rev() {
            let outcome = fx.scheduler.on_tick(actor, state.id).await;
            assert_eq!(outcome, TickOutcome::Progressed { remaining: expected });
        }
        let outcome = fx.scheduler.on_tick(actor, state.id).await;
        assert_eq!(
            outcome,
            TickOutcome::Completed(Completion::Teleported {
                removal: ItemRemoval::ActiveStack
            })
        );
        assert_eq!(fx.world.teleports(actor), vec![SPAWN]);
        assert_eq!(fx.world.slot_amount(actor, 0), 1);
        assert_eq!(fx.scheduler.in_flight(), 0);
        assert_eq!(fx.scheduler.live_timers(), 0);

        // Any later tick for the retired action is stale.
        assert_eq!(fx.scheduler.on_tick(actor, state.id).await, TickOutcome::Stale);
    }

    #[tokio::test]
    async fn tick_for_replaced_action_is_stale() {
        let fx = fixture();
        let actor = player(&fx, 1);
        let first = fx.scheduler.start(actor, paper()).await.unwrap();
        let second = fx.scheduler.start(actor, paper()).await.unwrap();
        assert_ne!(first.id, second.id);

        assert_eq!(fx.scheduler.on_tick(actor, first.id).await, TickOutcome::Stale);
        assert_eq!(
            fx.scheduler.snapshot(actor).map(|s| s.remaining_ticks),
            Some(5)
        );
    }

    #[tokio::test]
    async fn tick_cancels_when_moved() {
        let fx = fixture();
        let actor = player(&fx, 1);
        let state = fx.scheduler.start(actor, paper()).await.unwrap();

        fx.world
            .set_location(actor, Position::new(STAND.x, STAND.y + 1.0, STAND.z))
            .unwrap();
        assert_eq!(
            fx.scheduler.on_tick(actor, state.id).await,
            TickOutcome::Cancelled(CancelReason::Moved)
        );
        assert_eq!(
            fx.world.messages(actor).last().map(String::as_str),
            Some("Teleport cancelled: you moved!")
        );
        assert!(fx.world.teleports(actor).is_empty());
    }

    #[tokio::test]
    async fn turning_in_place_does_not_cancel() {
        let fx = fixture();
        let actor = player(&fx, 1);
        let state = fx.scheduler.start(actor, paper()).await.unwrap();

        let turned = fx.world.location(actor).unwrap().facing(270.0, 30.0);
        fx.world.set_location(actor, turned).unwrap();
        assert_eq!(
            fx.scheduler.on_tick(actor, state.id).await,
            TickOutcome::Progressed { remaining: 4 }
        );
    }

    #[tokio::test]
    async fn teleport_failure_drops_the_action() {
        let fx = fixture();
        let actor = player(&fx, 1);
        let state = fx.scheduler.start(actor, paper()).await.unwrap();
        for _ in 0..5 {
            let _ = fx.scheduler.on_tick(actor, state.id).await;
        }

        fx.world.fail_teleports(true);
        assert_eq!(
            fx.scheduler.on_tick(actor, state.id).await,
            TickOutcome::Completed(Completion::TeleportFailed)
        );
        assert_eq!(fx.scheduler.in_flight(), 0);
        assert_eq!(fx.scheduler.live_timers(), 0);
        // The item is kept when the teleport did not happen.
        assert_eq!(fx.world.slot_amount(actor, 0), 1);
        assert_eq!(
            fx.world.messages(actor).last().map(String::as_str),
            Some("Something went wrong while teleporting!")
        );
    }

    #[tokio::test]
    async fn notification_failures_are_not_fatal() {
        let fx = fixture();
        let actor = player(&fx, 1);
        fx.world.fail_notifications(true);

        let state = fx.scheduler.start(actor, paper()).await.unwrap();
        for _ in 0..5 {
            let _ = fx.scheduler.on_tick(actor, state.id).await;
        }
        let outcome = fx.scheduler.on_tick(actor, state.id).await;
        assert!(matches!(outcome, TickOutcome::Completed(Completion::Teleported { .. })));
        assert_eq!(fx.world.teleports(actor), vec![SPAWN]);
    }

    #[tokio::test]
    async fn vanished_actor_cancels_with_host_failure() {
        let fx = fixture();
        let actor = player(&fx, 1);
        let state = fx.scheduler.start(actor, paper()).await.unwrap();

        fx.world.despawn(actor);
        assert_eq!(
            fx.scheduler.on_tick(actor, state.id).await,
            TickOutcome::Cancelled(CancelReason::HostFailure)
        );
        assert_eq!(fx.scheduler.live_timers(), 0);
    }

    #[tokio::test]
    async fn rejected_starts_leave_no_lock_entries() {
        let fx = fixture();
        for _ in 0..100 {
            let actor = player(&fx, 1);
            fx.arena.leave(actor);
            assert!(fx.scheduler.start(actor, paper()).await.is_err());
        }
        let empty_handed = player(&fx, 0);
        assert!(fx.scheduler.start(empty_handed, paper()).await.is_err());

        assert!(fx.scheduler.shared.locks.is_empty());

        // A started countdown does not pin its lock either.
        let actor = player(&fx, 1);
        fx.scheduler.start(actor, paper()).await.unwrap();
        assert!(fx.scheduler.shared.locks.is_empty());
        assert!(fx.scheduler.cancel(actor, CancelReason::Manual).await.is_some());
        assert!(fx.scheduler.shared.locks.is_empty());
    }

    #[tokio::test]
    async fn failed_retrigger_still_cancels_the_running_countdown() {
        let fx = fixture();
        let actor = player(&fx, 1);
        fx.scheduler.start(actor, paper()).await.unwrap();

        fx.arena.add_team("red", None);
        let retrigger = fx.scheduler.start(actor, paper()).await;
        assert!(matches!(retrigger, Err(RecallError::NoDestination { .. })));
        assert_eq!(fx.scheduler.in_flight(), 0);
        assert_eq!(fx.scheduler.live_timers(), 0);
        assert_eq!(
            fx.world.messages(actor),
            vec![
                "Teleporting to your team spawn in 5 seconds, do not move...".to_owned(),
                "Teleport cancelled!".to_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn ineligible_retrigger_keeps_the_running_countdown() {
        let fx = fixture();
        let actor = player(&fx, 1);
        let state = fx.scheduler.start(actor, paper()).await.unwrap();

        fx.arena.leave(actor);
        let retrigger = fx.scheduler.start(actor, paper()).await;
        assert!(matches!(retrigger, Err(RecallError::IneligibleActor { .. })));
        assert_eq!(fx.scheduler.snapshot(actor).map(|s| s.id), Some(state.id));
    }

    #[tokio::test]
    async fn elapsed_time_counts_from_the_start() {
        let fx = fixture();
        let actor = player(&fx, 1);
        let mut state = fx.scheduler.start(actor, paper()).await.unwrap();
        state.started_at -= chrono::Duration::seconds(3);
        assert!(elapsed_ms(&state) >= 3_000);
    }

    #[tokio::test]
    async fn starts_are_refused_after_shutdown() {
        let fx = fixture();
        let actor = player(&fx, 1);
        assert_eq!(fx.scheduler.shutdown().await, 0);
        assert!(fx.scheduler.is_shutting_down());
        assert!(matches!(
            fx.scheduler.start(actor, paper()).await,
            Err(RecallError::ShuttingDown)
        ));
    }
}
