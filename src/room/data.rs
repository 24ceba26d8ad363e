use crate::location::*;
use crate::message::*;
use std::collections::HashMap;

/// Read-only tile lookups over one snapshot. Scoring routines take this
/// rather than the raw grids so they can be driven from any snapshot source.
pub trait TileQuery {
    fn nutrient(&self, pos: Point) -> i32;

    fn owner(&self, pos: Point) -> Option<TeamId>;

    fn biomass(&self, pos: Point) -> i32;
}

/// Indexed view of a single tick's snapshot from one team's perspective.
///
/// Built once per tick and never mutated; every phase of the pipeline reads
/// from the same view.
pub struct WorldView<'a> {
    state: &'a TeamGameState,
    team: &'a TeamInfo,
    width: i32,
    height: i32,
    /// Strongest enemy biomass per cell.
    enemy_biomass: HashMap<Point, i32>,
    /// Enemy cells sorted by descending biomass.
    enemies: Vec<(Point, i32)>,
    neutrals: Vec<(Point, i32)>,
    friendly_biomass: HashMap<Point, i32>,
    spawner_points: Vec<Point>,
}

impl<'a> WorldView<'a> {
    pub fn new(state: &'a TeamGameState) -> Result<WorldView<'a>, String> {
        let world = &state.world;
        let width = world.map.width;
        let height = world.map.height;

        let team = world
            .team_infos
            .get(&state.your_team_id)
            .ok_or_else(|| format!("Missing team info for team {}", state.your_team_id))?;

        Self::check_grid("nutrient", &world.map.nutrient_grid, width, height)?;
        Self::check_grid("ownership", &world.ownership_grid, width, height)?;
        Self::check_grid("biomass", &world.biomass_grid, width, height)?;

        let mut enemy_biomass: HashMap<Point, i32> = HashMap::new();
        let mut neutrals = Vec::new();

        for spore in world.spores.iter() {
            if spore.team_id == NEUTRAL_TEAM {
                neutrals.push((spore.position, spore.biomass));
            } else if spore.team_id != state.your_team_id {
                let entry = enemy_biomass.entry(spore.position).or_insert(0);
                *entry = (*entry).max(spore.biomass);
            }
        }

        let mut enemies: Vec<(Point, i32)> = enemy_biomass.iter().map(|(p, b)| (*p, *b)).collect();
        enemies.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut friendly_biomass: HashMap<Point, i32> = HashMap::new();

        for spore in team.spores.iter() {
            let entry = friendly_biomass.entry(spore.position).or_insert(0);
            *entry = (*entry).max(spore.biomass);
        }

        let spawner_points = team.spawners.iter().map(|s| s.position).collect();

        Ok(WorldView {
            state,
            team,
            width,
            height,
            enemy_biomass,
            enemies,
            neutrals,
            friendly_biomass,
            spawner_points,
        })
    }

    fn check_grid<T>(name: &str, grid: &[Vec<T>], width: i32, height: i32) -> Result<(), String> {
        if grid.len() != height as usize || grid.iter().any(|row| row.len() != width as usize) {
            return Err(format!("{} grid does not match map dimensions {}x{}", name, width, height));
        }

        Ok(())
    }

    pub fn tick(&self) -> u32 {
        self.state.tick
    }

    pub fn my_team_id(&self) -> TeamId {
        self.state.your_team_id
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn area(&self) -> i32 {
        self.width * self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2, self.height / 2)
    }

    pub fn in_bounds(&self, pos: Point) -> bool {
        pos.in_bounds(self.width, self.height)
    }

    /// In-bounds cardinal neighbours of `pos`.
    pub fn neighbours(&self, pos: Point) -> impl Iterator<Item = (Direction, Point)> + '_ {
        Direction::ALL
            .iter()
            .map(move |d| (*d, pos.step(*d)))
            .filter(move |(_, p)| self.in_bounds(*p))
    }

    pub fn is_mine(&self, pos: Point) -> bool {
        self.owner(pos) == Some(self.my_team_id())
    }

    /// Own territory that still carries biomass; moving along it is free.
    pub fn is_trail(&self, pos: Point) -> bool {
        self.is_mine(pos) && self.biomass(pos) >= 1
    }

    /// Biomass a unit spends entering `pos`.
    pub fn move_cost(&self, pos: Point) -> i32 {
        if self.is_trail(pos) {
            0
        } else {
            1
        }
    }

    pub fn enemy_at(&self, pos: Point) -> i32 {
        self.enemy_biomass.get(&pos).copied().unwrap_or(0)
    }

    pub fn friendly_at(&self, pos: Point) -> i32 {
        self.friendly_biomass.get(&pos).copied().unwrap_or(0)
    }

    pub fn enemy_biomass(&self) -> &HashMap<Point, i32> {
        &self.enemy_biomass
    }

    pub fn enemies(&self) -> &[(Point, i32)] {
        &self.enemies
    }

    pub fn neutrals(&self) -> &[(Point, i32)] {
        &self.neutrals
    }

    pub fn spawner_points(&self) -> &[Point] {
        &self.spawner_points
    }

    pub fn has_spawner_at(&self, pos: Point) -> bool {
        self.spawner_points.contains(&pos)
    }

    /// Strongest enemy on a cardinal neighbour of `pos`.
    pub fn adjacent_enemy_max(&self, pos: Point) -> i32 {
        pos.neighbours().map(|(_, p)| self.enemy_at(p)).max().unwrap_or(0)
    }

    /// Enemy-occupied cells within `radius` of `pos`.
    pub fn enemy_density(&self, pos: Point, radius: i32) -> usize {
        self.enemy_biomass.keys().filter(|p| p.distance_to(pos) <= radius).count()
    }

    /// Distance to the nearest of the `sample` strongest enemies; 999 without enemies.
    pub fn min_enemy_distance(&self, pos: Point, sample: usize) -> i32 {
        self.enemies.iter().take(sample).map(|(p, _)| p.distance_to(pos)).min().unwrap_or(999)
    }

    pub fn units(&self) -> &'a [Spore] {
        &self.team.spores
    }

    pub fn actionable_units(&self) -> Vec<&'a Spore> {
        self.team.spores.iter().filter(|s| s.is_actionable()).collect()
    }

    pub fn spawners(&self) -> &'a [Spawner] {
        &self.team.spawners
    }

    pub fn nutrients(&self) -> i32 {
        self.team.nutrients
    }

    pub fn next_spawner_cost(&self) -> i32 {
        self.team.next_spawner_cost
    }

    pub fn last_tick_errors(&self) -> &[String] {
        &self.state.last_tick_errors
    }

    /// Full ownership scan: (owned tile count, summed nutrient of owned tiles).
    pub fn scan_territory(&self) -> (usize, i64) {
        let me = self.my_team_id();
        let mut tiles = 0;
        let mut generation = 0;

        for (row_owner, row_nutrient) in self.state.world.ownership_grid.iter().zip(self.state.world.map.nutrient_grid.iter()) {
            for (owner, nutrient) in row_owner.iter().zip(row_nutrient.iter()) {
                if *owner == me {
                    tiles += 1;
                    generation += *nutrient as i64;
                }
            }
        }

        (tiles, generation)
    }
}

impl<'a> TileQuery for WorldView<'a> {
    fn nutrient(&self, pos: Point) -> i32 {
        if !self.in_bounds(pos) {
            return 0;
        }

        self.state.world.map.nutrient_grid[pos.y as usize][pos.x as usize]
    }

    fn owner(&self, pos: Point) -> Option<TeamId> {
        if !self.in_bounds(pos) {
            return None;
        }

        Some(self.state.world.ownership_grid[pos.y as usize][pos.x as usize])
    }

    fn biomass(&self, pos: Point) -> i32 {
        if !self.in_bounds(pos) {
            return 0;
        }

        self.state.world.biomass_grid[pos.y as usize][pos.x as usize]
    }
}
