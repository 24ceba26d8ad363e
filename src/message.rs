//! Snapshot and action types exchanged with the game engine.

use crate::location::*;
use serde::{Deserialize, Serialize};
use shrinkwraprs::*;
use std::collections::HashMap;
use std::fmt;

pub type TeamId = i32;

/// Team id the engine uses for neutral units.
pub const NEUTRAL_TEAM: TeamId = 0;

/// Minimum biomass for a unit to receive any action.
pub const ACTIONABLE_BIOMASS: i32 = 2;

#[derive(Shrinkwrap, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub String);

#[derive(Shrinkwrap, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpawnerId(pub String);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SpawnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spore {
    pub id: UnitId,
    pub team_id: TeamId,
    pub biomass: i32,
    pub position: Point,
}

impl Spore {
    pub fn is_actionable(&self) -> bool {
        self.biomass >= ACTIONABLE_BIOMASS
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spawner {
    pub id: SpawnerId,
    pub team_id: TeamId,
    pub position: Point,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInfo {
    pub team_id: TeamId,
    pub nutrients: i32,
    pub next_spawner_cost: i32,
    #[serde(default)]
    pub spores: Vec<Spore>,
    #[serde(default)]
    pub spawners: Vec<Spawner>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMap {
    pub width: i32,
    pub height: i32,
    /// Indexed `[y][x]`.
    pub nutrient_grid: Vec<Vec<i32>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameWorld {
    pub map: GameMap,
    /// Indexed `[y][x]`.
    pub ownership_grid: Vec<Vec<TeamId>>,
    /// Indexed `[y][x]`.
    pub biomass_grid: Vec<Vec<i32>>,
    #[serde(default)]
    pub spores: Vec<Spore>,
    #[serde(default)]
    pub spawners: Vec<Spawner>,
    pub team_infos: HashMap<TeamId, TeamInfo>,
}

/// Per-tick world snapshot as delivered by the engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamGameState {
    pub tick: u32,
    pub your_team_id: TeamId,
    #[serde(default)]
    pub last_tick_errors: Vec<String>,
    pub world: GameWorld,
    #[serde(default)]
    pub team_ids: Vec<TeamId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    #[serde(rename_all = "camelCase")]
    SpawnerProduceSpore { spawner_id: SpawnerId, biomass: i32 },
    #[serde(rename_all = "camelCase")]
    SporeCreateSpawner { spore_id: UnitId },
    #[serde(rename_all = "camelCase")]
    SporeMove { spore_id: UnitId, direction: Direction },
    #[serde(rename_all = "camelCase")]
    SporeMoveTo { spore_id: UnitId, position: Point },
    #[serde(rename_all = "camelCase")]
    SporeSplit {
        spore_id: UnitId,
        biomass_for_moving_spore: i32,
        direction: Direction,
    },
}

impl Action {
    pub fn unit_id(&self) -> Option<&UnitId> {
        match self {
            Action::SpawnerProduceSpore { .. } => None,
            Action::SporeCreateSpawner { spore_id }
            | Action::SporeMove { spore_id, .. }
            | Action::SporeMoveTo { spore_id, .. }
            | Action::SporeSplit { spore_id, .. } => Some(spore_id),
        }
    }

    pub fn spawner_id(&self) -> Option<&SpawnerId> {
        match self {
            Action::SpawnerProduceSpore { spawner_id, .. } => Some(spawner_id),
            _ => None,
        }
    }

    pub fn is_movement(&self) -> bool {
        matches!(self, Action::SporeMove { .. } | Action::SporeMoveTo { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_use_engine_tags() {
        let action = Action::SporeSplit {
            spore_id: UnitId("s1".to_string()),
            biomass_for_moving_spore: 3,
            direction: Direction::Right,
        };

        let value = serde_json::to_value(&action).unwrap();

        assert_eq!(value["type"], "SPORE_SPLIT");
        assert_eq!(value["sporeId"], "s1");
        assert_eq!(value["biomassForMovingSpore"], 3);
        assert_eq!(value["direction"]["x"], 1);

        let produce = serde_json::to_value(Action::SpawnerProduceSpore {
            spawner_id: SpawnerId("f1".to_string()),
            biomass: 5,
        })
        .unwrap();

        assert_eq!(produce["type"], "SPAWNER_PRODUCE_SPORE");
        assert_eq!(produce["spawnerId"], "f1");
    }

    #[test]
    fn team_infos_accept_string_keys() {
        let json = r#"{
            "tick": 4,
            "yourTeamId": 1,
            "world": {
                "map": { "width": 1, "height": 1, "nutrientGrid": [[3]] },
                "ownershipGrid": [[1]],
                "biomassGrid": [[0]],
                "teamInfos": {
                    "1": { "teamId": 1, "nutrients": 10, "nextSpawnerCost": 4 }
                }
            }
        }"#;

        let state: TeamGameState = serde_json::from_str(json).unwrap();

        assert_eq!(state.world.team_infos[&1].next_spawner_cost, 4);
        assert!(state.last_tick_errors.is_empty());
    }
}
