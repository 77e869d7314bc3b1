//! Scripted players for the demo host.
//!
//! Every player joins a team, holds paper, and right-clicks at the same
//! moment. Players then follow one of three scripts in rotation: stand
//! still until teleported, walk away mid-countdown, or drop the paper
//! mid-countdown.

use std::path::Path;
use std::time::Duration;

use recall_core::arena::StaticArena;
use recall_core::listener::{InteractOutcome, RecallListener};
use recall_core::world::MemoryWorld;
use recall_types::{ActorId, ClickAction, InteractEvent, ItemKind, ItemStack, Location, MoveEvent, Position};
use serde::Deserialize;
use tracing::info;

use crate::error::HostAppError;

// -----------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------

/// One team in the scripted match.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TeamConfig {
    /// Team name.
    pub name: String,
    /// Spawn point as `[x, y, z]`.
    pub spawn: [f64; 3],
}

/// The `scenario` section of `recall-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScenarioConfig {
    /// Teams in the match.
    #[serde(default = "default_teams")]
    pub teams: Vec<TeamConfig>,

    /// Players spawned per team.
    #[serde(default = "default_players_per_team")]
    pub players_per_team: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            teams: default_teams(),
            players_per_team: default_players_per_team(),
        }
    }
}

impl ScenarioConfig {
    /// Read the `scenario` section from a config file. A missing section
    /// yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, HostAppError> {
        let contents = std::fs::read_to_string(path).map_err(|e| HostAppError::Scenario {
            message: format!("failed to read config file: {e}"),
        })?;
        Self::parse(&contents)
    }

    /// Parse the `scenario` section from a full config document.
    pub fn parse(yaml: &str) -> Result<Self, HostAppError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: serde_yml::Value = serde_yml::from_str(yaml).map_err(|e| HostAppError::Scenario {
            message: format!("failed to parse config YAML: {e}"),
        })?;
        raw.get("scenario").map_or_else(
            || Ok(Self::default()),
            |section| {
                serde_yml::from_value(section.clone()).map_err(|e| HostAppError::Scenario {
                    message: format!("failed to parse scenario config: {e}"),
                })
            },
        )
    }
}

fn default_teams() -> Vec<TeamConfig> {
    vec![
        TeamConfig {
            name: String::from("red"),
            spawn: [0.0, 80.0, 0.0],
        },
        TeamConfig {
            name: String::from("blue"),
            spawn: [200.0, 80.0, 200.0],
        },
    ]
}

const fn default_players_per_team() -> u32 {
    3
}

// -----------------------------------------------------------------------
// Script
// -----------------------------------------------------------------------

/// What a scripted player does after right-clicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Stands still until teleported.
    StandStill,
    /// Steps sideways halfway through the third second.
    WalkAway,
    /// Drops every paper halfway through the fourth second.
    DropItem,
}

impl Script {
    const fn for_index(index: u32) -> Self {
        match index % 3 {
            0 => Self::StandStill,
            1 => Self::WalkAway,
            _ => Self::DropItem,
        }
    }
}

/// A spawned scripted player.
#[derive(Debug, Clone, Copy)]
pub struct Player {
    /// The player's actor id.
    pub actor: ActorId,
    /// Where the player stands when the scenario starts.
    pub stand: Position,
    /// What the player does.
    pub script: Script,
}

/// Tally of a finished scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScenarioReport {
    /// Players whose countdown started.
    pub started: usize,
    /// Players that reached their team spawn.
    pub teleported: usize,
    /// Players whose countdown was cancelled or never started.
    pub stayed: usize,
}

/// Create teams and players in the in-memory host.
pub fn populate(
    config: &ScenarioConfig,
    world: &MemoryWorld,
    arena: &StaticArena,
    item: &ItemKind,
) -> Result<Vec<Player>, HostAppError> {
    let mut players = Vec::new();
    let mut index: u32 = 0;
    for team in &config.teams {
        let [x, y, z] = team.spawn;
        arena.add_team(team.name.clone(), Some(Position::new(x, y, z)));

        for seat in 0..config.players_per_team {
            let actor = ActorId::new();
            let stand = Position::new(x + 20.0 + f64::from(seat) * 2.0, y - 16.0, z + 20.0);
            world.spawn(actor, stand);
            world.give(actor, 0, ItemStack::new(item.clone(), 2))?;
            arena.join(actor, team.name.clone());

            let script = Script::for_index(index);
            index = index.saturating_add(1);
            info!(%actor, team = team.name, %stand, ?script, "player spawned");
            players.push(Player {
                actor,
                stand,
                script,
            });
        }
    }
    Ok(players)
}

/// Play every player's script to the end and tally the results.
pub async fn run(
    listener: &RecallListener,
    world: &MemoryWorld,
    players: &[Player],
    item: &ItemKind,
    interval: Duration,
    total_ticks: u32,
) -> ScenarioReport {
    let scripts = players
        .iter()
        .map(|player| play(listener, world, *player, item, interval));
    let started = futures::future::join_all(scripts)
        .await
        .into_iter()
        .filter(|started| *started)
        .count();

    // Let the last countdowns finish.
    tokio::time::sleep(interval.saturating_mul(total_ticks.saturating_add(2))).await;

    let teleported = players
        .iter()
        .filter(|player| !world.teleports(player.actor).is_empty())
        .count();
    ScenarioReport {
        started,
        teleported,
        stayed: players.len().saturating_sub(teleported),
    }
}

async fn play(
    listener: &RecallListener,
    world: &MemoryWorld,
    player: Player,
    item: &ItemKind,
    interval: Duration,
) -> bool {
    let event = InteractEvent {
        actor: player.actor,
        item: Some(item.clone()),
        click: ClickAction::RightClickAir,
    };
    if !matches!(listener.on_interact(&event).await, InteractOutcome::Started(_)) {
        return false;
    }

    let half = interval.checked_div(2).unwrap_or_default();
    match player.script {
        Script::StandStill => {}
        Script::WalkAway => {
            tokio::time::sleep(interval.saturating_mul(2).saturating_add(half)).await;
            let from = Location::at(player.stand);
            let to = Location::at(Position::new(player.stand.x + 1.0, player.stand.y, player.stand.z));
            if world.set_location(player.actor, to).is_ok() {
                let _ = listener
                    .on_move(&MoveEvent {
                        actor: player.actor,
                        from,
                        to,
                    })
                    .await;
            }
        }
        Script::DropItem => {
            tokio::time::sleep(interval.saturating_mul(3).saturating_add(half)).await;
            let _ = world.take_all(player.actor, item);
        }
    }
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use recall_core::arena::{ArenaService, Services};
    use recall_core::config::RecallConfig;
    use recall_core::plugin::RecallPlugin;
    use recall_core::world::{ActorWorld, Inventory};

    use super::*;

    #[test]
    fn missing_section_uses_defaults() {
        let config = ScenarioConfig::parse("countdown:\n  total_ticks: 5\n").unwrap();
        assert_eq!(config, ScenarioConfig::default());
    }

    #[test]
    fn scenario_section_is_parsed() {
        let yaml = r"
scenario:
  teams:
    - name: green
      spawn: [1.0, 2.0, 3.0]
  players_per_team: 4
";
        let config = ScenarioConfig::parse(yaml).unwrap();
        assert_eq!(config.players_per_team, 4);
        assert_eq!(config.teams.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn only_still_players_arrive() {
        let recall = RecallConfig::default();
        let item = recall.item.required_kind();
        let world = Arc::new(MemoryWorld::new());
        let arena = Arc::new(StaticArena::new());
        let players = populate(&ScenarioConfig::default(), &world, &arena, &item).unwrap();

        let services = Services::new().with_arena(Arc::clone(&arena) as Arc<dyn ArenaService>);
        let plugin = RecallPlugin::enable(
            &recall,
            Arc::clone(&world) as Arc<dyn ActorWorld>,
            Arc::clone(&world) as Arc<dyn Inventory>,
            &services,
        )
        .unwrap();

        let report = run(
            plugin.listener(),
            &world,
            &players,
            &item,
            recall.countdown.interval(),
            recall.countdown.total_ticks,
        )
        .await;

        assert_eq!(report.started, 6);
        assert_eq!(report.teleported, 2);
        assert_eq!(report.stayed, 4);
        assert_eq!(plugin.disable().await, 0);
    }
}
