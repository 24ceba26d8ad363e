use crate::actions::*;
use crate::military::threatmap::*;
use crate::room::data::*;
use crate::room::territory::*;
use log::*;

/// Colony state the production table reads.
#[derive(Copy, Clone, Debug)]
pub struct ProductionStatus {
    pub tick: u32,
    pub units: usize,
    pub nutrients: i32,
    pub metrics: TerritoryMetrics,
    pub stagnant: bool,
}

/// Desired output for one facility before reserves are applied.
///
/// Early game keeps many small units coming; later phases spend in larger
/// bursts as the stockpile grows.
pub fn desired_size(status: &ProductionStatus, threat: i32) -> i32 {
    let n = status.nutrients;

    if status.stagnant && n >= 30 {
        return (n / 3).min(15);
    }

    if status.tick < 150 {
        return if status.units < 10 {
            (n / 6).max(8)
        } else if status.units < 20 {
            (n / 8).max(6)
        } else {
            (n / 10).max(4)
        };
    }

    if status.tick < 400 {
        let generation = status.metrics.generation;

        return if generation < 15 {
            (n / 10).max(5)
        } else if generation < 30 {
            (n / 8).max(6)
        } else {
            (n / 7).max(7)
        };
    }

    if status.tick < 700 {
        return if threat > 0 {
            (threat + 3).max(8)
        } else if status.metrics.control < 0.4 {
            (n / 6).max(8)
        } else {
            (n / 8).max(6)
        };
    }

    if n >= 2000 {
        (n / 5).min(15)
    } else if n >= 1000 {
        (n / 6).min(12)
    } else if threat > 0 {
        (threat + 3).max(8)
    } else {
        (n / 8).max(7)
    }
}

/// Nutrients kept back after production.
pub fn reserve(started_small: bool, facilities: usize) -> i32 {
    if started_small {
        2
    } else if facilities >= 2 {
        3
    } else {
        4
    }
}

/// Final size for a facility holding `available` nutrients, or `None` when it
/// should skip this tick. Threat raises the floor; the reserve caps the size.
pub fn production_size(status: &ProductionStatus, threat: i32, available: i32, reserve: i32) -> Option<i32> {
    let floor = if threat > 0 { threat + 3 } else { 2 };
    let budget = available - reserve;
    let size = desired_size(status, threat).max(floor).min(budget);

    (size >= floor).then_some(size)
}

/// Sizes and queues production for every facility without an action this tick.
pub fn run_production(view: &WorldView, threat: &ThreatMap, status: ProductionStatus, started_small: bool, queue: &mut ActionQueue) {
    let keep = reserve(started_small, view.spawners().len());
    let mut available = status.nutrients;

    for spawner in view.spawners() {
        if queue.spawner_used(&spawner.id) {
            continue;
        }

        let local = threat.local(spawner.position).max(view.adjacent_enemy_max(spawner.position));

        let status = ProductionStatus { nutrients: available, ..status };

        let size = match production_size(&status, local, available, keep) {
            Some(size) => size,
            None => continue,
        };

        if queue.produce(&spawner.id, size) {
            available -= size;

            debug!("Facility {} produces {} (threat {}, {} left)", spawner.id, size, local, available);
        }
    }
}
