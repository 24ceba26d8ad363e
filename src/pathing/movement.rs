use super::history::*;
use super::lanes::*;
use super::search::*;
use crate::actions::*;
use crate::config::*;
use crate::location::*;
use crate::message::*;
use crate::military::combat::*;
use crate::military::defense::*;
use crate::selection::*;
use crate::timing::*;
use log::*;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Emergency merge
// ---------------------------------------------------------------------------

/// Steps a few endangered free units toward a nearby stronger friend.
/// Returns the number of merge moves queued.
pub fn emergency_merge(ctx: &SearchContext, units: &[&Spore], queue: &mut ActionQueue, deadline: &Deadline, config: &EngineConfig) -> usize {
    let view = ctx.view;
    let threat = ctx.threat;

    let endangered: Vec<&Spore> = units
        .iter()
        .copied()
        .filter(|s| queue.is_free(&s.id))
        .filter(|s| threat.get(s.position) > 0 || view.adjacent_enemy_max(s.position) > 0 || s.biomass <= ACTIONABLE_BIOMASS)
        .take(config.movement.merge_candidates)
        .collect();

    let mut merged = 0;

    for unit in endangered {
        if deadline.below(config.timing.merge_step_reserve()) {
            break;
        }

        let buddy = view
            .units()
            .iter()
            .filter(|b| b.id != unit.id && b.biomass > unit.biomass && !queue.has_role(&b.id, Assignment::BUILDER))
            .map(|b| (b, b.position.distance_to(unit.position)))
            .filter(|(_, d)| *d >= 1 && *d <= config.movement.merge_range)
            .min_by_key(|(b, d)| (*d, -b.biomass));

        let (buddy, distance) = match buddy {
            Some(found) => found,
            None => continue,
        };

        let step = view
            .neighbours(unit.position)
            .filter(|(_, p)| p.distance_to(buddy.position) < distance)
            .min_by_key(|(_, p)| view.move_cost(*p));

        let (direction, next) = match step {
            Some(step) => step,
            None => continue,
        };

        if threat.get(next) >= unit.biomass {
            continue;
        }

        if unit.biomass == ACTIONABLE_BIOMASS && view.move_cost(next) > 0 {
            continue;
        }

        if queue.move_unit(&unit.id, direction, Assignment::MERGE) {
            debug!("Merge {} -> {} toward {}", unit.id, next, buddy.id);

            merged += 1;
        }
    }

    merged
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// Colony-level inputs to the movement phase.
pub struct MovementPlan<'a> {
    pub defenders: &'a Defenders,
    /// Uncommitted combat opportunities; their attackers hunt.
    pub hunters: &'a [Opportunity],
    pub use_lanes: bool,
    pub survival: bool,
    pub facilities: usize,
    pub actionable: usize,
}

impl<'a> MovementPlan<'a> {
    fn hunter_targets(&self) -> HashMap<&'a UnitId, Point> {
        let mut targets = HashMap::new();

        for opportunity in self.hunters.iter() {
            targets.entry(&opportunity.attacker).or_insert(opportunity.target);
        }

        targets
    }

    fn pioneer_eligible(&self) -> bool {
        !self.survival && (self.facilities >= 1 || self.actionable >= 3)
    }
}

fn role_flag(role: Role) -> Assignment {
    match role {
        Role::Explorer => Assignment::EXPLORER,
        Role::Hunter { .. } => Assignment::HUNTER,
        Role::Defender { .. } => Assignment::DEFENDER,
    }
}

/// Moves every unit still without an action, strongest first. Stops early at
/// the unit cap or when the budget runs low. Returns the number of units moved.
#[allow(clippy::too_many_arguments)]
pub fn move_units(
    ctx: &SearchContext,
    plan: &MovementPlan,
    units: &[&Spore],
    lanes: &mut LanePlanner,
    history: &PositionHistory,
    queue: &mut ActionQueue,
    deadline: &Deadline,
    config: &EngineConfig,
) -> usize {
    let view = ctx.view;
    let tick = view.tick();
    let hunters = plan.hunter_targets();
    let cap = unit_cap(&config.search, deadline.remaining_fraction());

    let mut considered = 0;
    let mut moved = 0;

    for unit in units.iter().copied() {
        if deadline.below(config.timing.movement_reserve()) {
            debug!("Movement stopped on budget after {} units", considered);
            break;
        }

        if considered >= cap {
            debug!("Movement stopped at unit cap {}", cap);
            break;
        }

        let role = if let Some(facility) = plan.defenders.facility_for(&unit.id) {
            if !queue.can_act(&unit.id, Assignment::DEFENDER) {
                continue;
            }

            if holds_position(view, ctx.threat, unit, facility, &config.combat) {
                continue;
            }

            Role::Defender { facility }
        } else if !queue.is_free(&unit.id) {
            continue;
        } else if let Some(target) = hunters.get(&unit.id) {
            Role::Hunter { target: *target }
        } else {
            Role::Explorer
        };

        considered += 1;

        let lane_target = match role {
            Role::Explorer if plan.use_lanes => lanes.target_for(&unit.id, unit.position, ctx.center, tick, &config.lanes),
            _ => None,
        };

        let pioneer = unit.biomass == ACTIONABLE_BIOMASS
            && plan.pioneer_eligible()
            && lane_target
                .map(|t| t.distance_to(unit.position) >= config.search.pioneer_distance)
                .unwrap_or(false);

        let mover = Mover {
            unit,
            role,
            lane_target,
            previous: history.previous(&unit.id),
            pioneer,
        };

        let limits = SearchLimits::scaled(&config.search, deadline.remaining_fraction());
        let flag = role_flag(role);

        match ctx.search(&mover, limits, deadline).or_else(|| ctx.greedy(&mover)) {
            Selection::Found(step) => {
                if queue.move_unit(&unit.id, step.direction, flag) {
                    trace!("{} {:?} steps {:?} toward {} ({})", unit.id, role, step.direction, step.destination, step.score);
                    moved += 1;
                }

                continue;
            }
            Selection::NotFound => {}
        }

        if mover.trail_bound() {
            trace!("{} idles on trail", unit.id);
            continue;
        }

        match fallback_target(ctx, &mover) {
            Selection::Found(target) => {
                if queue.move_unit_to(&unit.id, target, flag) {
                    debug!("{} {:?} falls back to move-to {}", unit.id, role, target);
                    moved += 1;
                }
            }
            Selection::NotFound => debug!("{} idles, nothing reachable", unit.id),
        }
    }

    moved
}

/// Move-to target used when neither the search nor the greedy step found a move.
fn fallback_target(ctx: &SearchContext, mover: &Mover) -> Selection<Point> {
    let pos = mover.unit.position;

    if let Role::Defender { facility } = mover.role {
        return if facility != pos { Selection::Found(facility) } else { Selection::NotFound };
    }

    let lane: Selection<Point> = mover
        .lane_target
        .filter(|t| *t != pos && ctx.threat.get(*t) < mover.unit.biomass)
        .into();

    lane.or_else(|| ctx.nearest_reachable(mover))
}
