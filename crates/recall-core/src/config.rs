//! Configuration loading and typed config structures for Recall.
//!
//! The canonical configuration lives in `recall-config.yaml` next to the
//! host binary. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty file (or no file) is valid.

use std::path::Path;
use std::time::Duration;

use recall_types::ItemKind;
use serde::Deserialize;

/// Environment variable that overrides `countdown.tick_interval_ms`.
pub const TICK_INTERVAL_ENV: &str = "RECALL_TICK_INTERVAL_MS";

/// Placeholder replaced by the remaining seconds in message templates.
const SECONDS_PLACEHOLDER: &str = "{seconds}";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level Recall configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecallConfig {
    /// Countdown length and tick interval.
    #[serde(default)]
    pub countdown: CountdownConfig,

    /// Which item triggers the countdown and how.
    #[serde(default)]
    pub item: ItemConfig,

    /// Actor-facing message templates.
    #[serde(default)]
    pub messages: MessagesConfig,
}

impl RecallConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `RECALL_TICK_INTERVAL_MS` overrides `countdown.tick_interval_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.countdown.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.countdown.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "countdown.tick_interval_ms must be at least 1".to_owned(),
            });
        }
        if self.item.required_item.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "item.required_item must name an item".to_owned(),
            });
        }
        Ok(())
    }
}

/// Countdown configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CountdownConfig {
    /// Number of progress ticks before the teleport fires.
    #[serde(default = "default_total_ticks")]
    pub total_ticks: u32,

    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl CountdownConfig {
    /// Override the tick interval from the environment when set.
    ///
    /// Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(TICK_INTERVAL_ENV) {
            if let Ok(ms) = val.trim().parse::<u64>() {
                self.tick_interval_ms = ms;
            }
        }
    }

    /// The tick interval as a [`Duration`], never zero.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            total_ticks: default_total_ticks(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Trigger item configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemConfig {
    /// Item kind that starts the countdown and is consumed on arrival.
    #[serde(default = "default_required_item")]
    pub required_item: String,

    /// Only right clicks (air or block) start the countdown.
    #[serde(default = "default_true")]
    pub require_right_click: bool,
}

impl ItemConfig {
    /// The required item as an [`ItemKind`].
    pub fn required_kind(&self) -> ItemKind {
        ItemKind::new(self.required_item.trim())
    }
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            required_item: default_required_item(),
            require_right_click: true,
        }
    }
}

/// Actor-facing message templates.
///
/// `{seconds}` is replaced with the remaining countdown where it applies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    /// Sent when a countdown starts.
    pub started: String,
    /// Sent on every progress tick.
    pub countdown: String,
    /// Sent after a successful teleport.
    pub completed: String,
    /// Sent when movement cancels the countdown.
    pub cancelled_moved: String,
    /// Sent when the item is no longer held.
    pub cancelled_item: String,
    /// Sent for every other cancellation.
    pub cancelled: String,
    /// Sent when the actor is not in a running game.
    pub not_in_game: String,
    /// Sent when the actor's team spawn cannot be found.
    pub no_destination: String,
    /// Sent when the actor does not hold the required item.
    pub item_required: String,
    /// Sent when a collaborator failed before the countdown started.
    pub unavailable: String,
    /// Sent when the teleport itself failed.
    pub failed: String,
}

impl MessagesConfig {
    /// Substitute `{seconds}` in a template.
    pub fn render(template: &str, seconds: u32) -> String {
        template.replace(SECONDS_PLACEHOLDER, &seconds.to_string())
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            started: "Teleporting to your team spawn in {seconds} seconds, do not move...".to_owned(),
            countdown: "Teleporting in {seconds}s...".to_owned(),
            completed: "Teleported to your team spawn!".to_owned(),
            cancelled_moved: "Teleport cancelled: you moved!".to_owned(),
            cancelled_item: "Teleport cancelled: you are no longer holding the item!".to_owned(),
            cancelled: "Teleport cancelled!".to_owned(),
            not_in_game: "This can only be used during a game!".to_owned(),
            no_destination: "Could not find your team's spawn!".to_owned(),
            item_required: "You must hold the item to teleport!".to_owned(),
            unavailable: "Teleporting is temporarily unavailable.".to_owned(),
            failed: "Something went wrong while teleporting!".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_total_ticks() -> u32 {
    5
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_required_item() -> String {
    "paper".to_owned()
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RecallConfig::default();
        assert_eq!(config.countdown.total_ticks, 5);
        assert_eq!(config.countdown.interval(), Duration::from_secs(1));
        assert_eq!(config.item.required_kind(), ItemKind::from("paper"));
        assert!(config.item.require_right_click);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
countdown:
  total_ticks: 3
  tick_interval_ms: 250

item:
  required_item: "ender_pearl"
  require_right_click: false

messages:
  completed: "Home sweet home."
  countdown: "{seconds}..."
"#;

        let config = RecallConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.countdown.total_ticks, 3);
        assert_eq!(config.item.required_item, "ender_pearl");
        assert!(!config.item.require_right_click);
        assert_eq!(config.messages.completed, "Home sweet home.");
        // Unlisted messages keep their defaults.
        assert_eq!(config.messages.cancelled, "Teleport cancelled!");
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "countdown:\n  total_ticks: 10\n";
        let config = RecallConfig::parse(yaml).ok().unwrap_or_default();
        assert_eq!(config.countdown.total_ticks, 10);
        assert_eq!(config.item.required_item, "paper");
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(RecallConfig::parse("").is_ok());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let yaml = "countdown:\n  tick_interval_ms: 0\n";
        let result = RecallConfig::parse(yaml);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn blank_item_is_rejected() {
        let yaml = "item:\n  required_item: \"  \"\n";
        assert!(matches!(
            RecallConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result = RecallConfig::parse("countdown: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn render_substitutes_seconds() {
        let messages = MessagesConfig::default();
        assert_eq!(
            MessagesConfig::render(&messages.countdown, 4),
            "Teleporting in 4s..."
        );
        assert_eq!(MessagesConfig::render("no placeholder", 4), "no placeholder");
    }
}
