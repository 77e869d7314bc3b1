//! Arena service capability and the host service registry.
//!
//! Whether an actor is allowed to start a countdown, and where their team
//! spawns, is owned by the arena (game mode) running on the host. The
//! scheduler sees it only through [`ArenaService`]. The integration layer
//! registers a concrete adapter in [`Services`] before the plugin is
//! enabled; the plugin resolves it exactly once at startup.

use std::sync::Arc;

use dashmap::DashMap;
use recall_types::{ActorId, Position};

use crate::error::{HostError, RecallError};

/// Service name used in [`RecallError::AdapterUnavailable`].
pub const ARENA_SERVICE: &str = "arena";

/// Game-state queries the countdown depends on.
pub trait ArenaService: Send + Sync {
    /// Whether the actor is in a state where the countdown may start
    /// (for example, currently playing a match).
    fn is_eligible(&self, actor: ActorId) -> Result<bool, HostError>;

    /// The actor's teleport target. `None` is an expected answer (no team,
    /// or a team without a spawn point).
    fn resolve_destination(&self, actor: ActorId) -> Result<Option<Position>, HostError>;
}

/// Services registered by the host before the plugin is enabled.
#[derive(Clone, Default)]
pub struct Services {
    arena: Option<Arc<dyn ArenaService>>,
}

impl Services {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the arena adapter, replacing any earlier one.
    pub fn register_arena(&mut self, arena: Arc<dyn ArenaService>) {
        self.arena = Some(arena);
    }

    /// Builder-style variant of [`register_arena`](Self::register_arena).
    #[must_use]
    pub fn with_arena(mut self, arena: Arc<dyn ArenaService>) -> Self {
        self.register_arena(arena);
        self
    }

    /// Resolve the arena adapter.
    ///
    /// # Errors
    ///
    /// Returns [`RecallError::AdapterUnavailable`] when none was registered.
    pub fn arena(&self) -> Result<Arc<dyn ArenaService>, RecallError> {
        self.arena
            .as_ref()
            .map(Arc::clone)
            .ok_or(RecallError::AdapterUnavailable {
                service: ARENA_SERVICE,
            })
    }
}

impl core::fmt::Debug for Services {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Services")
            .field("arena", &self.arena.is_some())
            .finish()
    }
}

/// In-memory arena: named teams with optional spawn points.
///
/// Actors on a team count as playing; actors on no team are ineligible.
#[derive(Debug, Default)]
pub struct StaticArena {
    spawns: DashMap<String, Option<Position>>,
    members: DashMap<ActorId, String>,
}

impl StaticArena {
    /// An arena with no teams.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a team and its spawn point.
    pub fn add_team(&self, team: impl Into<String>, spawn: Option<Position>) {
        self.spawns.insert(team.into(), spawn);
    }

    /// Put an actor on a team.
    pub fn join(&self, actor: ActorId, team: impl Into<String>) {
        self.members.insert(actor, team.into());
    }

    /// Take an actor out of the match.
    pub fn leave(&self, actor: ActorId) {
        self.members.remove(&actor);
    }
}

impl ArenaService for StaticArena {
    fn is_eligible(&self, actor: ActorId) -> Result<bool, HostError> {
        Ok(self.members.contains_key(&actor))
    }

    fn resolve_destination(&self, actor: ActorId) -> Result<Option<Position>, HostError> {
        let Some(team) = self.members.get(&actor).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };
        Ok(self.spawns.get(&team).and_then(|spawn| *spawn.value()))
    }
}
