//! Snapshot builder shared by the unit tests.

use crate::location::*;
use crate::message::*;
use std::collections::HashMap;

pub use crate::message::NEUTRAL_TEAM;

pub const MY_TEAM: TeamId = 1;
pub const ENEMY_TEAM: TeamId = 2;

pub struct Fixture {
    state: TeamGameState,
}

impl Fixture {
    /// Empty `width` x `height` grid with our team and one rival, both broke.
    pub fn new(width: i32, height: i32) -> Fixture {
        let grid = || vec![vec![0; width as usize]; height as usize];

        let mut team_infos = HashMap::new();

        for team in [MY_TEAM, ENEMY_TEAM] {
            team_infos.insert(
                team,
                TeamInfo {
                    team_id: team,
                    nutrients: 0,
                    next_spawner_cost: 4,
                    spores: Vec::new(),
                    spawners: Vec::new(),
                },
            );
        }

        Fixture {
            state: TeamGameState {
                tick: 1,
                your_team_id: MY_TEAM,
                last_tick_errors: Vec::new(),
                world: GameWorld {
                    map: GameMap {
                        width,
                        height,
                        nutrient_grid: grid(),
                    },
                    ownership_grid: grid(),
                    biomass_grid: grid(),
                    spores: Vec::new(),
                    spawners: Vec::new(),
                    team_infos,
                },
                team_ids: vec![MY_TEAM, ENEMY_TEAM],
            },
        }
    }

    pub fn tick(mut self, tick: u32) -> Self {
        self.state.tick = tick;
        self
    }

    pub fn nutrient(mut self, x: i32, y: i32, value: i32) -> Self {
        self.state.world.map.nutrient_grid[y as usize][x as usize] = value;
        self
    }

    pub fn own(mut self, x: i32, y: i32, team: TeamId) -> Self {
        self.state.world.ownership_grid[y as usize][x as usize] = team;
        self
    }

    /// Own cell carrying residual biomass.
    pub fn trail(mut self, x: i32, y: i32) -> Self {
        self.state.world.ownership_grid[y as usize][x as usize] = MY_TEAM;
        self.state.world.biomass_grid[y as usize][x as usize] = 1;
        self
    }

    /// Places a unit and claims its cell for `team`.
    pub fn unit(mut self, id: &str, team: TeamId, x: i32, y: i32, biomass: i32) -> Self {
        let spore = Spore {
            id: UnitId(id.to_string()),
            team_id: team,
            biomass,
            position: Point::new(x, y),
        };

        self.state.world.ownership_grid[y as usize][x as usize] = team;
        self.state.world.biomass_grid[y as usize][x as usize] = biomass;
        self.state.world.spores.push(spore.clone());

        if let Some(info) = self.state.world.team_infos.get_mut(&team) {
            info.spores.push(spore);
        }

        self
    }

    pub fn spawner(mut self, id: &str, team: TeamId, x: i32, y: i32) -> Self {
        let spawner = Spawner {
            id: SpawnerId(id.to_string()),
            team_id: team,
            position: Point::new(x, y),
        };

        self.state.world.ownership_grid[y as usize][x as usize] = team;
        self.state.world.spawners.push(spawner.clone());

        if let Some(info) = self.state.world.team_infos.get_mut(&team) {
            info.spawners.push(spawner);
        }

        self
    }

    pub fn nutrients(mut self, nutrients: i32) -> Self {
        if let Some(info) = self.state.world.team_infos.get_mut(&MY_TEAM) {
            info.nutrients = nutrients;
        }
        self
    }

    pub fn next_cost(mut self, cost: i32) -> Self {
        if let Some(info) = self.state.world.team_infos.get_mut(&MY_TEAM) {
            info.next_spawner_cost = cost;
        }
        self
    }

    pub fn build(self) -> TeamGameState {
        self.state
    }
}
