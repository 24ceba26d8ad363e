use crate::actions::*;
use crate::config::*;
use crate::findnearest::*;
use crate::location::*;
use crate::message::*;
use crate::room::data::*;
use log::*;
use std::cmp::Ordering;

/// A weaker enemy or neutral unit that a friendly unit can overrun.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Opportunity {
    pub target: Point,
    pub profit: i32,
    pub attacker: UnitId,
    pub distance: i32,
}

impl Opportunity {
    /// Orders by profit per step, best first, without float division.
    fn compare_yield(&self, other: &Opportunity) -> Ordering {
        let lhs = self.profit as i64 * (other.distance as i64 + 1);
        let rhs = other.profit as i64 * (self.distance as i64 + 1);

        rhs.cmp(&lhs)
    }
}

/// Scans enemies and neutrals for profitable kills by free actionable units.
///
/// Each target is matched to its nearest eligible attacker; the result holds at
/// most `max_targets` opportunities ordered by profit per step.
pub fn find_targets(view: &WorldView, queue: &ActionQueue, config: &CombatConfig) -> Vec<Opportunity> {
    let attackers: Vec<&Spore> = view.actionable_units().into_iter().filter(|s| queue.is_free(&s.id)).collect();

    if attackers.is_empty() {
        return Vec::new();
    }

    let mut targets = Vec::new();

    for (enemy_pos, enemy_biomass) in view.enemies() {
        let candidates = attackers.iter().filter(|s| s.biomass > enemy_biomass + config.enemy_margin);

        if let Some((attacker, distance)) = candidates.find_nearest_in_range(*enemy_pos, config.enemy_range) {
            targets.push(Opportunity {
                target: *enemy_pos,
                profit: view.nutrient(*enemy_pos) + enemy_biomass,
                attacker: attacker.id.clone(),
                distance,
            });
        }
    }

    for (neutral_pos, neutral_biomass) in view.neutrals() {
        let candidates = attackers.iter().filter(|s| s.biomass > *neutral_biomass);

        if let Some((attacker, distance)) = candidates.find_nearest_in_range(*neutral_pos, config.neutral_range) {
            targets.push(Opportunity {
                target: *neutral_pos,
                profit: view.nutrient(*neutral_pos) + neutral_biomass / 2,
                attacker: attacker.id.clone(),
                distance,
            });
        }
    }

    targets.sort_by(|a, b| a.compare_yield(b));
    targets.truncate(config.max_targets);

    targets
}

/// Commits a move-to for every opportunity above the profit threshold whose
/// attacker is still free. Returns the opportunities left uncommitted.
pub fn commit_targets(opportunities: Vec<Opportunity>, queue: &mut ActionQueue, config: &CombatConfig) -> Vec<Opportunity> {
    let mut leftover = Vec::new();

    for opportunity in opportunities {
        if opportunity.profit > config.profit_threshold && queue.move_unit_to(&opportunity.attacker, opportunity.target, Assignment::HUNTER) {
            debug!(
                "Hunter {} -> {} (profit {}, distance {})",
                opportunity.attacker, opportunity.target, opportunity.profit, opportunity.distance
            );

            continue;
        }

        leftover.push(opportunity);
    }

    leftover
}
