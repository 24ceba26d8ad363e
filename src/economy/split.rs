use crate::actions::*;
use crate::config::*;
use crate::location::*;
use crate::message::*;
use crate::military::threatmap::*;
use crate::room::data::*;
use itertools::*;
use log::*;

/// Best empty, survivable neighbour for a split of `unit`, with its score.
fn best_direction(view: &WorldView, threat: &ThreatMap, unit: &Spore, config: &SplitConfig) -> Option<(Direction, i64)> {
    let mut best: Option<(Direction, i64)> = None;

    for (direction, pos) in view.neighbours(unit.position) {
        if view.biomass(pos) != 0 || view.enemy_at(pos) >= unit.biomass || threat.get(pos) >= unit.biomass {
            continue;
        }

        let mut score = view.nutrient(pos) as i64;

        if !view.is_mine(pos) {
            score += config.unclaimed_bonus;
        }

        score -= threat.get(pos) as i64 * config.threat_weight;
        score -= view.adjacent_enemy_max(pos) as i64 * config.adjacent_weight;

        if best.map(|(_, s)| score > s).unwrap_or(true) {
            best = Some((direction, score));
        }
    }

    best
}

/// Splits one of the largest free units toward a rich empty neighbour, to
/// grow the unit count. At most one split per tick.
pub fn attempt_split(view: &WorldView, threat: &ThreatMap, queue: &mut ActionQueue, config: &SplitConfig) -> Option<UnitId> {
    if !config.enabled || view.units().len() >= config.max_colony {
        return None;
    }

    let candidates = view
        .units()
        .iter()
        .filter(|s| s.biomass >= config.min_biomass)
        .sorted_by_key(|s| -s.biomass)
        .take(config.candidates);

    for unit in candidates {
        if !queue.is_free(&unit.id) {
            continue;
        }

        let (direction, score) = match best_direction(view, threat, unit, config) {
            Some(best) => best,
            None => continue,
        };

        let moving = unit.biomass / 2;

        if score < config.min_score || moving < ACTIONABLE_BIOMASS || moving >= unit.biomass {
            continue;
        }

        if queue.split(&unit.id, moving, direction) {
            debug!("Split {}: {} moving {:?}, {} staying", unit.id, moving, direction, unit.biomass - moving);

            return Some(unit.id.clone());
        }
    }

    None
}
