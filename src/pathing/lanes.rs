//! Quadrant lanes for expansion on larger maps.
//!
//! The map is split into four quadrants around the colony center. Each
//! quadrant holds a distant, valuable target for a few ticks and each unit is
//! pinned to one quadrant for longer, so explorers fan out instead of all
//! chasing the same cell and oscillating as scores shift.

use crate::config::*;
use crate::location::*;
use crate::message::*;
use crate::military::threatmap::*;
use crate::room::data::*;
use crate::room::tiles::*;
use log::*;
use std::collections::{HashMap, HashSet};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lane {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Lane {
    pub const ALL: [Lane; 4] = [Lane::NorthWest, Lane::NorthEast, Lane::SouthWest, Lane::SouthEast];

    /// Quadrant of `pos` relative to `center`. Cells on the center row or
    /// column fall to the south and east.
    pub fn of(pos: Point, center: Point) -> Lane {
        match (pos.y < center.y, pos.x < center.x) {
            (true, true) => Lane::NorthWest,
            (true, false) => Lane::NorthEast,
            (false, true) => Lane::SouthWest,
            (false, false) => Lane::SouthEast,
        }
    }
}

/// Center the colony expands from: the first facility, else the mean
/// position of actionable units, else the middle of the map.
pub fn colony_center(view: &WorldView) -> Point {
    if let Some(first) = view.spawner_points().first() {
        return *first;
    }

    let units = view.actionable_units();

    if units.is_empty() {
        return view.center();
    }

    let count = units.len() as i32;
    let (sum_x, sum_y) = units.iter().fold((0, 0), |(x, y), s| (x + s.position.x, y + s.position.y));

    Point::new(sum_x / count, sum_y / count)
}

#[derive(Copy, Clone, Debug)]
struct Expiring<T> {
    value: T,
    expires: u32,
}

impl<T: Copy> Expiring<T> {
    fn live(&self, tick: u32) -> Option<T> {
        (tick <= self.expires).then_some(self.value)
    }
}

#[derive(Default)]
pub struct LanePlanner {
    targets: HashMap<Lane, Expiring<Point>>,
    assignments: HashMap<UnitId, Expiring<Lane>>,
}

impl LanePlanner {
    pub fn new() -> LanePlanner {
        LanePlanner::default()
    }

    pub fn target(&self, lane: Lane, tick: u32) -> Option<Point> {
        self.targets.get(&lane).and_then(|t| t.live(tick))
    }

    /// Drops expired targets and picks a new one for every quadrant lacking
    /// a live target, scanning a prefix of the nutrient ranking.
    pub fn refresh_targets(&mut self, view: &WorldView, threat: &ThreatMap, tiles: &TopTiles, center: Point, stagnant: bool, config: &LaneConfig) {
        let tick = view.tick();

        self.targets.retain(|_, t| t.live(tick).is_some());

        let missing: Vec<Lane> = Lane::ALL.iter().copied().filter(|l| !self.targets.contains_key(l)).collect();

        if missing.is_empty() {
            return;
        }

        let (ttl, scan, distance_weight) = if stagnant {
            (config.stagnant_ttl, config.stagnant_scan, config.stagnant_distance_weight)
        } else {
            (config.ttl, config.scan, config.distance_weight)
        };

        let mut best: HashMap<Lane, (i64, Point)> = HashMap::new();

        for pos in tiles.prefix(scan).iter().copied() {
            let mine = view.is_mine(pos);
            let distance = pos.distance_to(center);

            if mine && distance <= config.home_radius {
                continue;
            }

            if threat.get(pos) >= config.max_threat {
                continue;
            }

            let lane = Lane::of(pos, center);

            if !missing.contains(&lane) {
                continue;
            }

            let mut score = view.nutrient(pos) as i64 * config.nutrient_weight + distance as i64 * distance_weight;

            if !mine {
                score += config.unclaimed_bonus;
            }

            match best.get(&lane) {
                Some((best_score, _)) if *best_score >= score => {}
                _ => {
                    best.insert(lane, (score, pos));
                }
            }
        }

        for (lane, (score, pos)) in best {
            debug!("Lane {:?} targets {} (score {}) until {}", lane, pos, score, tick + ttl);

            self.targets.insert(lane, Expiring { value: pos, expires: tick + ttl });
        }
    }

    /// Quadrant for `unit`, kept for the assignment TTL once chosen.
    pub fn assign(&mut self, unit: &UnitId, pos: Point, center: Point, tick: u32, config: &LaneConfig) -> Lane {
        if let Some(lane) = self.assignments.get(unit).and_then(|a| a.live(tick)) {
            return lane;
        }

        let lane = Lane::of(pos, center);

        self.assignments.insert(
            unit.clone(),
            Expiring {
                value: lane,
                expires: tick + config.assignment_ttl,
            },
        );

        lane
    }

    /// Lane target for `unit`, assigning it to a quadrant if needed.
    pub fn target_for(&mut self, unit: &UnitId, pos: Point, center: Point, tick: u32, config: &LaneConfig) -> Option<Point> {
        let lane = self.assign(unit, pos, center, tick, config);

        self.target(lane, tick)
    }

    /// Forgets assignments of units that no longer exist.
    pub fn sweep(&mut self, live: &HashSet<UnitId>) {
        self.assignments.retain(|id, _| live.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::*;

    #[test]
    fn quadrants_split_on_center() {
        let center = Point::new(5, 5);

        assert_eq!(Lane::of(Point::new(1, 1), center), Lane::NorthWest);
        assert_eq!(Lane::of(Point::new(5, 1), center), Lane::NorthEast);
        assert_eq!(Lane::of(Point::new(1, 5), center), Lane::SouthWest);
        assert_eq!(Lane::of(Point::new(5, 5), center), Lane::SouthEast);
    }

    #[test]
    fn center_prefers_facility_then_units() {
        let with_facility = Fixture::new(10, 10).spawner("f", MY_TEAM, 2, 3).unit("a", MY_TEAM, 8, 8, 5).build();
        assert_eq!(colony_center(&WorldView::new(&with_facility).unwrap()), Point::new(2, 3));

        let units = Fixture::new(10, 10).unit("a", MY_TEAM, 2, 2, 5).unit("b", MY_TEAM, 5, 7, 3).unit("c", MY_TEAM, 9, 9, 1).build();
        assert_eq!(colony_center(&WorldView::new(&units).unwrap()), Point::new(3, 4));

        let empty = Fixture::new(10, 8).build();
        assert_eq!(colony_center(&WorldView::new(&empty).unwrap()), Point::new(5, 4));
    }

    #[test]
    fn targets_lock_until_expiry() {
        let config = LaneConfig::default();
        let mut planner = LanePlanner::new();
        let center = Point::new(10, 10);

        let state = Fixture::new(20, 20).tick(5).nutrient(2, 2, 50).nutrient(18, 18, 50).nutrient(11, 11, 50).build();
        let view = WorldView::new(&state).unwrap();
        let mut tiles = TopTiles::new();
        tiles.ensure(&view, 20, 20, 400);

        planner.refresh_targets(&view, &ThreatMap::default(), &tiles, center, false, &config);

        assert_eq!(planner.target(Lane::NorthWest, 5), Some(Point::new(2, 2)));
        assert_eq!(planner.target(Lane::SouthEast, 5), Some(Point::new(18, 18)));
        assert_eq!(planner.target(Lane::NorthWest, 15), Some(Point::new(2, 2)));
        assert_eq!(planner.target(Lane::NorthWest, 16), None);

        let unit = UnitId("u".to_string());
        assert_eq!(planner.assign(&unit, Point::new(1, 1), center, 5, &config), Lane::NorthWest);
        assert_eq!(planner.assign(&unit, Point::new(15, 15), center, 30, &config), Lane::NorthWest);
        assert_eq!(planner.assign(&unit, Point::new(15, 15), center, 31, &config), Lane::SouthEast);

        planner.sweep(&HashSet::new());
        assert_eq!(planner.assign(&unit, Point::new(15, 1), center, 32, &config), Lane::NorthEast);
    }
}
