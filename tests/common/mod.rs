#![allow(dead_code)]

use colony_bot::message::*;
use serde_json::{json, Value};

pub const ME: i32 = 1;
pub const ENEMY: i32 = 2;
pub const NEUTRAL: i32 = 0;

/// Builds engine snapshots as the JSON the game server sends.
#[derive(Clone)]
pub struct Snapshot {
    tick: u32,
    width: usize,
    height: usize,
    nutrient: Vec<Vec<i32>>,
    ownership: Vec<Vec<i32>>,
    biomass: Vec<Vec<i32>>,
    spores: Vec<Value>,
    spawners: Vec<Value>,
    nutrients: i32,
    cost: i32,
    errors: Vec<String>,
}

impl Snapshot {
    pub fn new(width: usize, height: usize) -> Snapshot {
        Snapshot {
            tick: 1,
            width,
            height,
            nutrient: vec![vec![0; width]; height],
            ownership: vec![vec![0; width]; height],
            biomass: vec![vec![0; width]; height],
            spores: Vec::new(),
            spawners: Vec::new(),
            nutrients: 0,
            cost: 4,
            errors: Vec::new(),
        }
    }

    pub fn tick(mut self, tick: u32) -> Self {
        self.tick = tick;
        self
    }

    pub fn set_tick(&mut self, tick: u32) {
        self.tick = tick;
    }

    pub fn nutrient(mut self, x: usize, y: usize, value: i32) -> Self {
        self.nutrient[y][x] = value;
        self
    }

    pub fn trail(mut self, x: usize, y: usize) -> Self {
        self.ownership[y][x] = ME;
        self.biomass[y][x] = 1;
        self
    }

    pub fn unit(mut self, id: &str, team: i32, x: usize, y: usize, biomass: i32) -> Self {
        self.ownership[y][x] = team;
        self.biomass[y][x] = biomass;
        self.spores.push(json!({
            "id": id,
            "teamId": team,
            "biomass": biomass,
            "position": { "x": x, "y": y },
        }));
        self
    }

    pub fn spawner(mut self, id: &str, team: i32, x: usize, y: usize) -> Self {
        self.ownership[y][x] = team;
        self.spawners.push(json!({
            "id": id,
            "teamId": team,
            "position": { "x": x, "y": y },
        }));
        self
    }

    pub fn nutrients(mut self, nutrients: i32) -> Self {
        self.nutrients = nutrients;
        self
    }

    pub fn cost(mut self, cost: i32) -> Self {
        self.cost = cost;
        self
    }

    pub fn error(mut self, message: &str) -> Self {
        self.errors.push(message.to_string());
        self
    }

    fn team_info(&self, team: i32) -> Value {
        let owned = |items: &[Value]| -> Vec<Value> { items.iter().filter(|v| v["teamId"] == team).cloned().collect() };

        let (nutrients, cost) = if team == ME { (self.nutrients, self.cost) } else { (0, 4) };

        json!({
            "teamId": team,
            "nutrients": nutrients,
            "nextSpawnerCost": cost,
            "spores": owned(&self.spores),
            "spawners": owned(&self.spawners),
        })
    }

    pub fn json(&self) -> Value {
        json!({
            "tick": self.tick,
            "yourTeamId": ME,
            "lastTickErrors": self.errors,
            "teamIds": [ME, ENEMY],
            "world": {
                "map": {
                    "width": self.width,
                    "height": self.height,
                    "nutrientGrid": self.nutrient,
                },
                "ownershipGrid": self.ownership,
                "biomassGrid": self.biomass,
                "spores": self.spores,
                "spawners": self.spawners,
                "teamInfos": {
                    "1": self.team_info(ME),
                    "2": self.team_info(ENEMY),
                },
            },
        })
    }

    pub fn state(&self) -> TeamGameState {
        serde_json::from_value(self.json()).expect("snapshot should deserialize")
    }
}

pub fn unit(id: &str) -> UnitId {
    UnitId(id.to_string())
}

pub fn actions_for<'a>(actions: &'a [Action], id: &str) -> Vec<&'a Action> {
    actions.iter().filter(|a| a.unit_id().map(|u| u.0 == id).unwrap_or(false)).collect()
}
