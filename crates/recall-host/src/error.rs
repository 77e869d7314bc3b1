//! Error types for the Recall demo host.
//!
//! [`HostAppError`] wraps every failure that can stop the host before or
//! while it runs the scripted scenario.

/// Top-level error for the demo host binary.
#[derive(Debug, thiserror::Error)]
pub enum HostAppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: recall_core::config::ConfigError,
    },

    /// The plugin could not be enabled.
    #[error("recall error: {source}")]
    Recall {
        /// The underlying plugin error.
        #[from]
        source: recall_core::error::RecallError,
    },

    /// Setting up the in-memory world failed.
    #[error("world error: {source}")]
    World {
        /// The underlying host error.
        #[from]
        source: recall_core::error::HostError,
    },

    /// The scenario section of the config file is malformed.
    #[error("scenario error: {message}")]
    Scenario {
        /// Description of the failure.
        message: String,
    },
}
