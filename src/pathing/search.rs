//! Bounded breadth-first movement search.
//!
//! Each actionable unit explores outward from its cell up to a depth and node
//! limit, scoring every reachable cell for its role. The first step toward
//! the best cell becomes its move. Cells the unit cannot survive are never
//! entered.

use crate::config::*;
use crate::location::*;
use crate::message::*;
use crate::military::threatmap::*;
use crate::room::data::*;
use crate::selection::*;
use crate::timing::*;
use lerp::*;
use pathfinding::directed::dijkstra::*;
use std::collections::{HashSet, VecDeque};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    Explorer,
    /// Scored toward a profitable kill that was not committed outright.
    Hunter { target: Point },
    Defender { facility: Point },
}

/// A unit about to be moved, with everything its scoring depends on.
#[derive(Clone, Debug)]
pub struct Mover<'a> {
    pub unit: &'a Spore,
    pub role: Role,
    pub lane_target: Option<Point>,
    pub previous: Option<Point>,
    /// Low-biomass unit allowed to leave its trail toward a distant lane target.
    pub pioneer: bool,
}

impl<'a> Mover<'a> {
    fn biomass(&self) -> i32 {
        self.unit.biomass
    }

    fn start(&self) -> Point {
        self.unit.position
    }

    /// A 2-biomass unit that must not strand itself off the trail.
    pub fn trail_bound(&self) -> bool {
        self.biomass() == ACTIONABLE_BIOMASS && !self.pioneer
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchLimits {
    pub depth: u32,
    pub nodes: usize,
}

impl SearchLimits {
    /// Shrinks from the configured maximum toward the minimum as the tick
    /// budget drains.
    pub fn scaled(config: &SearchConfig, remaining_fraction: f32) -> SearchLimits {
        let depth = (config.min_depth as f32).lerp_bounded(config.max_depth as f32, remaining_fraction);
        let nodes = (config.min_nodes as f32).lerp_bounded(config.max_nodes as f32, remaining_fraction);

        SearchLimits {
            depth: depth.round() as u32,
            nodes: nodes.round() as usize,
        }
    }
}

/// Units moved per tick, shrinking with the remaining budget.
pub fn unit_cap(config: &SearchConfig, remaining_fraction: f32) -> usize {
    (config.min_units as f32).lerp_bounded(config.max_units as f32, remaining_fraction).round() as usize
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub direction: Direction,
    /// Best cell found; the unit only takes the first step toward it.
    pub destination: Point,
    pub score: i64,
}

/// A scored step and the order its destination was discovered in.
#[derive(Copy, Clone, Debug)]
struct Candidate {
    step: Step,
    order: usize,
}

impl Candidate {
    /// Higher score wins; equal scores go to the earlier discovery.
    fn beats(&self, other: &Candidate) -> bool {
        self.step.score > other.step.score || (self.step.score == other.step.score && self.order < other.order)
    }
}

/// Keeps the first of equally scored candidates in `slot`.
fn offer(slot: &mut Option<Candidate>, candidate: Candidate) {
    if slot.map(|s| candidate.step.score > s.step.score).unwrap_or(true) {
        *slot = Some(candidate);
    }
}

#[derive(Copy, Clone, Debug)]
struct Node {
    pos: Point,
    depth: u32,
    first: Direction,
    first_cost: i32,
    path_cost: i32,
}

/// Per-tick scoring inputs shared by all movers.
pub struct SearchContext<'a, 'b> {
    pub view: &'a WorldView<'b>,
    pub threat: &'a ThreatMap,
    pub center: Point,
    pub stagnant: bool,
    /// Lanes are in use; discourages loitering in the home cluster.
    pub lanes_active: bool,
    pub two_biomass_penalty: i64,
    pub pioneer_penalty: i64,
    pub config: &'a SearchConfig,
}

impl<'a, 'b> SearchContext<'a, 'b> {
    /// Cells the mover may never enter: lethal threat or an enemy it cannot beat.
    pub fn is_safe(&self, mover: &Mover, pos: Point) -> bool {
        let biomass = mover.biomass();
        let enemy = self.view.enemy_at(pos);

        self.threat.get(pos) < biomass && !(enemy > 0 && biomass <= enemy)
    }

    /// Whether the mover's own cell is currently threatened.
    fn start_unsafe(&self, mover: &Mover) -> bool {
        self.threat.get(mover.start()) > 0 || self.view.adjacent_enemy_max(mover.start()) > 0
    }

    fn role_score(&self, mover: &Mover, pos: Point) -> i64 {
        let view = self.view;
        let config = self.config;
        let biomass = mover.biomass();
        let nutrient = view.nutrient(pos) as i64;

        match mover.role {
            Role::Hunter { target } => {
                let enemy = view.enemy_at(pos);
                let mut score = nutrient - pos.distance_to(target) as i64 * config.approach_weight;

                if enemy > 0 {
                    score += config.kill_bonus + (biomass - enemy) as i64 * config.kill_margin_weight;
                }

                score
            }
            Role::Defender { facility } => {
                let mut score = -(pos.distance_to(facility) as i64) * config.approach_weight + nutrient / 2;

                if view.is_mine(pos) {
                    score += config.guard_owned_bonus;
                }

                score
            }
            Role::Explorer => {
                let mine = view.is_mine(pos);
                let mut score = nutrient * config.explore_nutrient_weight;

                if !mine {
                    score += config.unclaimed_bonus;
                }

                if let Some(lane) = mover.lane_target {
                    let (progress_weight, outward_weight) = if self.stagnant {
                        (config.stagnant_lane_progress_weight, config.stagnant_outward_weight)
                    } else {
                        (config.lane_progress_weight, config.outward_weight)
                    };

                    let progress = (mover.start().distance_to(lane) - pos.distance_to(lane)) as i64;
                    let outward = (pos.distance_to(self.center) - mover.start().distance_to(self.center)) as i64;

                    score += progress * progress_weight + outward * outward_weight;
                }

                if self.lanes_active && mine && pos.distance_to(self.center) <= 3 {
                    score -= config.home_penalty;
                }

                score
            }
        }
    }

    /// Score of reaching `pos` via `node`'s path. Callers must check `is_safe`.
    fn score_cell(&self, mover: &Mover, pos: Point, depth: u32, first: Point, first_cost: i32, path_cost: i32) -> i64 {
        let view = self.view;
        let config = self.config;
        let biomass = mover.biomass();

        let mut score = self.role_score(mover, pos);

        if view.move_cost(pos) == 0 {
            score += config.trail_bonus;
        }

        let enemy = view.enemy_at(pos);

        if enemy > 0 && biomass > enemy {
            score += config.kill_bonus + (biomass - enemy) as i64 * config.kill_margin_weight;
        }

        score -= self.threat.get(pos) as i64 * config.threat_penalty;
        score -= view.adjacent_enemy_max(pos) as i64 * config.adjacent_penalty;

        score -= path_cost as i64 * config.path_cost_penalty;
        score -= depth.saturating_sub(1) as i64 * config.distance_penalty;

        if biomass == ACTIONABLE_BIOMASS && first_cost > 0 {
            score -= if mover.pioneer { self.pioneer_penalty } else { self.two_biomass_penalty };
        }

        if mover.previous == Some(first) && !self.start_unsafe(mover) {
            score -= config.backtrack_penalty;
        }

        if view.friendly_at(pos) > 0 {
            score -= config.crowding_penalty;
        }

        score
    }

    /// Breadth-first search from the mover's cell. Ties keep the first cell
    /// discovered, whether or not it lies on the trail. Trail-bound units prefer any trail step and take a costly
    /// first step only when it scores positively.
    pub fn search(&self, mover: &Mover, limits: SearchLimits, deadline: &Deadline) -> Selection<Step> {
        let start = mover.start();
        let biomass = mover.biomass();

        let mut visited: HashSet<Point> = HashSet::new();
        visited.insert(start);

        let mut open: VecDeque<Node> = VecDeque::new();
        let mut expanded = 0;

        let mut best_trail: Option<Candidate> = None;
        let mut best_any: Option<Candidate> = None;
        let mut discovered = 0;

        let mut expand = |node: Option<Node>, open: &mut VecDeque<Node>, visited: &mut HashSet<Point>| {
            let from = node.map(|n| n.pos).unwrap_or(start);
            let depth = node.map(|n| n.depth).unwrap_or(0) + 1;

            for (direction, pos) in self.view.neighbours(from) {
                if !visited.insert(pos) || !self.is_safe(mover, pos) {
                    continue;
                }

                let step_cost = self.view.move_cost(pos);
                let (first, first_cost) = match node {
                    Some(n) => (n.first, n.first_cost),
                    None => (direction, step_cost),
                };
                let path_cost = node.map(|n| n.path_cost).unwrap_or(0) + step_cost;

                let score = self.score_cell(mover, pos, depth, start.step(first), first_cost, path_cost);
                let step = Step {
                    direction: first,
                    destination: pos,
                    score,
                };

                let slot = if first_cost == 0 { &mut best_trail } else { &mut best_any };
                offer(slot, Candidate { step, order: discovered });
                discovered += 1;

                if depth < limits.depth && biomass - path_cost >= ACTIONABLE_BIOMASS {
                    open.push_back(Node {
                        pos,
                        depth,
                        first,
                        first_cost,
                        path_cost,
                    });
                }
            }
        };

        expand(None, &mut open, &mut visited);

        while let Some(node) = open.pop_front() {
            if expanded >= limits.nodes || deadline.expired() {
                break;
            }

            expanded += 1;
            expand(Some(node), &mut open, &mut visited);
        }

        Self::pick(mover, best_trail, best_any)
    }

    fn pick(mover: &Mover, best_trail: Option<Candidate>, best_any: Option<Candidate>) -> Selection<Step> {
        if mover.trail_bound() {
            return match (best_trail, best_any) {
                (Some(trail), _) => Selection::Found(trail.step),
                (None, Some(costly)) if costly.step.score > 0 => Selection::Found(costly.step),
                _ => Selection::NotFound,
            };
        }

        match (best_trail, best_any) {
            (Some(trail), Some(costly)) => Selection::Found(if costly.beats(&trail) { costly.step } else { trail.step }),
            (Some(only), None) | (None, Some(only)) => Selection::Found(only.step),
            (None, None) => Selection::NotFound,
        }
    }

    /// Single-step re-scoring of the four neighbours. When the mover's own
    /// cell is lethal, unsafe neighbours are accepted at a heavy penalty.
    pub fn greedy(&self, mover: &Mover) -> Selection<Step> {
        let start = mover.start();
        let desperate = self.threat.get(start) >= mover.biomass();

        let mut best_trail: Option<Candidate> = None;
        let mut best_any: Option<Candidate> = None;

        for (order, (direction, pos)) in self.view.neighbours(start).enumerate() {
            let safe = self.is_safe(mover, pos);

            if !safe && !desperate {
                continue;
            }

            let cost = self.view.move_cost(pos);
            let mut score = self.score_cell(mover, pos, 1, pos, cost, cost);

            if !safe {
                score -= self.config.desperate_penalty;
            }

            let step = Step {
                direction,
                destination: pos,
                score,
            };

            let slot = if cost == 0 { &mut best_trail } else { &mut best_any };
            offer(slot, Candidate { step, order });
        }

        Self::pick(mover, best_trail, best_any)
    }

    /// Richest cell reachable through safe cells within the fallback radius.
    pub fn nearest_reachable(&self, mover: &Mover) -> Selection<Point> {
        let start = mover.start();
        let radius = self.config.fallback_radius;

        let reachable = dijkstra_all(&start, |pos: &Point| {
            self.view
                .neighbours(*pos)
                .filter(|(_, p)| p.distance_to(start) <= radius && self.is_safe(mover, *p))
                .map(|(_, p)| (p, 1 + self.view.move_cost(p) as u32))
                .collect::<Vec<_>>()
        });

        reachable
            .into_iter()
            .map(|(pos, (_, cost))| (pos, cost))
            .filter(|(pos, _)| self.view.nutrient(*pos) > 0)
            .max_by(|(a, a_cost), (b, b_cost)| {
                self.view
                    .nutrient(*a)
                    .cmp(&self.view.nutrient(*b))
                    .then(b_cost.cmp(a_cost))
                    .then(b.cmp(a))
            })
            .map(|(pos, _)| pos)
            .into()
    }
}
