use super::threatmap::*;
use crate::actions::*;
use crate::config::*;
use crate::findnearest::*;
use crate::location::*;
use crate::message::*;
use crate::room::data::*;
use log::*;
use std::collections::HashMap;

/// Units guarding facilities this tick, keyed to the facility they guard.
#[derive(Default)]
pub struct Defenders {
    assigned: HashMap<UnitId, Point>,
}

impl Defenders {
    pub fn facility_for(&self, unit: &UnitId) -> Option<Point> {
        self.assigned.get(unit).copied()
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

/// Picks defenders for threatened facilities and reserves them.
///
/// A facility under direct threat takes the nearest free unit that outweighs
/// the threat by the configured margin. A facility with enemies only next to it
/// takes a sturdy unit, but only while there are fewer defenders than
/// facilities. Defenders already close to home and unthreatened are left idle.
pub fn assign_defenders(view: &WorldView, threat: &ThreatMap, queue: &mut ActionQueue, config: &CombatConfig) -> Defenders {
    let mut defenders = Defenders::default();

    let facilities = view.spawner_points();

    if facilities.is_empty() {
        return defenders;
    }

    let units = view.actionable_units();

    for facility in facilities.iter() {
        let direct = threat.get(*facility);
        let adjacent = view.adjacent_enemy_max(*facility);

        let required = if direct > 0 {
            direct + config.defender_margin
        } else if adjacent > 0 && defenders.len() < facilities.len() {
            config.adjacent_defender_biomass
        } else {
            continue;
        };

        let candidate = units
            .iter()
            .filter(|s| s.biomass >= required && queue.is_free(&s.id))
            .find_nearest_linear(*facility);

        if let Some(unit) = candidate {
            queue.reserve(&unit.id, Assignment::DEFENDER);
            defenders.assigned.insert(unit.id.clone(), *facility);

            debug!("Defender {} assigned to {} (threat {}, adjacent {})", unit.id, facility, direct, adjacent);
        }
    }

    defenders
}

/// Whether a defender can stay put: near its facility with nothing on or next to it.
pub fn holds_position(view: &WorldView, threat: &ThreatMap, unit: &Spore, facility: Point, config: &CombatConfig) -> bool {
    unit.position.distance_to(facility) <= config.guard_radius && threat.get(unit.position) == 0 && view.adjacent_enemy_max(unit.position) == 0
}
