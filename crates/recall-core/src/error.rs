//! Error types for the `recall-core` crate.
//!
//! [`RecallError`] is what a rejected countdown start reports to its
//! caller. [`HostError`] is what the host collaborators report when a
//! query or command cannot be carried out.

use recall_types::ActorId;

/// Failures reported by host collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The host does not know the actor (e.g. the player logged out).
    #[error("unknown actor: {0}")]
    UnknownActor(ActorId),

    /// A query or command failed inside the host.
    #[error("{command} failed for {actor}: {message}")]
    CommandFailed {
        /// The actor the command targeted.
        actor: ActorId,
        /// Short name of the command (`teleport`, `notify`, ...).
        command: &'static str,
        /// Description of the failure.
        message: String,
    },
}

/// Reasons a countdown could not be started, or the plugin not enabled.
#[derive(Debug, thiserror::Error)]
pub enum RecallError {
    /// The actor is not in a state where a countdown may start.
    #[error("actor {actor} is not eligible for a countdown")]
    IneligibleActor {
        /// The rejected actor.
        actor: ActorId,
    },

    /// The arena service had no destination for the actor.
    #[error("no destination for actor {actor}")]
    NoDestination {
        /// The rejected actor.
        actor: ActorId,
    },

    /// The actor does not hold the required item anywhere.
    #[error("actor {actor} does not hold the required item")]
    ItemNotHeld {
        /// The rejected actor.
        actor: ActorId,
    },

    /// Another countdown was registered for the actor concurrently.
    #[error("actor {actor} already has a countdown in flight")]
    AlreadyInFlight {
        /// The rejected actor.
        actor: ActorId,
    },

    /// The scheduler is shutting down and accepts no new countdowns.
    #[error("scheduler is shutting down")]
    ShuttingDown,

    /// A required host service was not registered at startup.
    #[error("adapter unavailable: {service}")]
    AdapterUnavailable {
        /// Name of the missing service.
        service: &'static str,
    },

    /// A host collaborator failed.
    #[error("host error: {source}")]
    Host {
        /// The underlying host error.
        #[from]
        source: HostError,
    },
}
