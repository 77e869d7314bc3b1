//! Demo host for the Recall countdown teleport.
//!
//! Stands in for a game server: it owns an in-memory world and arena,
//! enables the plugin against them, plays a short scripted match, and
//! disables the plugin again.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `recall-config.yaml`
//! 3. Build the in-memory world and arena, register the arena service
//! 4. Enable the plugin
//! 5. Play the scripted scenario
//! 6. Disable the plugin and log the result

mod error;
mod scenario;

use std::path::Path;
use std::sync::Arc;

use recall_core::arena::{ArenaService, Services, StaticArena};
use recall_core::config::RecallConfig;
use recall_core::plugin::RecallPlugin;
use recall_core::world::{ActorWorld, Inventory, MemoryWorld};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::HostAppError;
use crate::scenario::ScenarioConfig;

const CONFIG_PATH: &str = "recall-config.yaml";

/// Application entry point for the demo host.
///
/// # Errors
///
/// Returns an error if configuration, world setup or plugin enable fails.
#[tokio::main]
async fn main() -> Result<(), HostAppError> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("recall-host starting");

    // 2. Load configuration.
    let (config, scenario) = load_config()?;
    info!(
        total_ticks = config.countdown.total_ticks,
        tick_interval_ms = config.countdown.tick_interval_ms,
        teams = scenario.teams.len(),
        players_per_team = scenario.players_per_team,
        "Configuration loaded"
    );

    // 3. Build the host world and register services.
    let item = config.item.required_kind();
    let world = Arc::new(MemoryWorld::new());
    let arena = Arc::new(StaticArena::new());
    let players = scenario::populate(&scenario, &world, &arena, &item)?;
    let services = Services::new().with_arena(arena as Arc<dyn ArenaService>);

    // 4. Enable the plugin.
    let plugin = RecallPlugin::enable(
        &config,
        Arc::clone(&world) as Arc<dyn ActorWorld>,
        Arc::clone(&world) as Arc<dyn Inventory>,
        &services,
    )?;

    // 5. Play the match.
    let report = scenario::run(
        plugin.listener(),
        &world,
        &players,
        &item,
        config.countdown.interval(),
        config.countdown.total_ticks,
    )
    .await;
    info!(
        started = report.started,
        teleported = report.teleported,
        stayed = report.stayed,
        "Scenario finished"
    );

    // 6. Disable.
    let cancelled = plugin.disable().await;
    info!(cancelled, "recall-host stopped");
    Ok(())
}

/// Load the plugin and scenario configuration from `recall-config.yaml`,
/// falling back to defaults when the file does not exist.
fn load_config() -> Result<(RecallConfig, ScenarioConfig), HostAppError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        let config = RecallConfig::from_file(config_path)?;
        let scenario = ScenarioConfig::from_file(config_path)?;
        Ok((config, scenario))
    } else {
        info!("Config file not found, using defaults");
        let mut config = RecallConfig::default();
        config.countdown.apply_env_overrides();
        config.validate()?;
        Ok((config, ScenarioConfig::default()))
    }
}
