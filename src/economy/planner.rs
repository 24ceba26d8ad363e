//! Facility timing: whether this tick is the time to found a facility, and
//! how strong the founding unit must be.

use crate::config::*;
use crate::room::classify::*;
use crate::room::territory::*;

/// How hard the planner is pushing for a facility.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    /// Conditions are rich; only build with a comfortable margin.
    Strict,
    /// Accept a unit that just covers the cost.
    Relaxed,
    /// Build with whatever is available.
    Forced,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BuildDecision {
    pub min_biomass: i32,
    pub urgency: Urgency,
}

impl BuildDecision {
    fn new(min_biomass: i32, urgency: Urgency) -> BuildDecision {
        BuildDecision { min_biomass, urgency }
    }

    pub fn is_emergency(&self) -> bool {
        self.urgency == Urgency::Forced
    }
}

/// Colony state the timing rules read.
#[derive(Copy, Clone, Debug)]
pub struct ColonyStatus {
    pub kind: MapKind,
    pub tick: u32,
    pub actionable: usize,
    pub max_biomass: i32,
    pub cost: i32,
    pub nutrients: i32,
    /// The colony started with three units or fewer.
    pub started_small: bool,
}

/// Stalling pressure that escalates any tier to forced.
fn under_pressure(status: &ColonyStatus, config: &PlannerConfig) -> bool {
    status.tick >= config.pressure_tick
        || (status.tick >= config.lonely_pressure_tick && status.actionable <= config.lonely_units)
        || (status.tick >= config.rich_pressure_tick && status.max_biomass >= status.cost * 2)
}

/// Decides whether to found the first facility this tick.
///
/// Early ticks demand a margin, later ticks accept the bare cost, and past the
/// map's deadline the build is forced regardless of unit strength so the
/// colony can never wait indefinitely.
pub fn first_facility(status: &ColonyStatus, config: &PlannerConfig) -> Option<BuildDecision> {
    if status.actionable == 0 {
        return None;
    }

    let cost = status.cost;
    let forced = || BuildDecision::new(cost.max(2), Urgency::Forced);
    let tick = status.tick;
    let several = status.actionable >= 2;
    let max = status.max_biomass;

    let decision = match status.kind {
        MapKind::ObstacleDenseSmall => {
            let schedule = config.dense;

            if tick <= schedule.strict_until {
                (several && max >= cost + 2).then(|| BuildDecision::new(cost + 2, Urgency::Strict))
            } else if tick <= schedule.relaxed_until {
                (max >= cost).then(|| BuildDecision::new(cost, Urgency::Relaxed))
            } else {
                Some(forced())
            }
        }
        MapKind::Medium | MapKind::Large => {
            let schedule = config.wide;

            if tick <= schedule.strict_until {
                (max >= cost).then(|| BuildDecision::new(cost, Urgency::Strict))
            } else if tick <= schedule.relaxed_until {
                (max >= cost.max(3)).then(|| BuildDecision::new(cost.max(3), Urgency::Relaxed))
            } else {
                Some(forced())
            }
        }
        MapKind::Open => {
            let schedule = config.open;

            if tick <= schedule.strict_until {
                (several && max >= cost + 1).then(|| BuildDecision::new(cost + 1, Urgency::Strict))
            } else if tick <= schedule.relaxed_until {
                (max >= cost).then(|| BuildDecision::new(cost, Urgency::Relaxed))
            } else {
                Some(forced())
            }
        }
    };

    decision.or_else(|| under_pressure(status, config).then(forced))
}

/// Biomass assumed for the builder when scoring candidate sites.
pub fn first_site_hint(status: &ColonyStatus, decision: &BuildDecision) -> i32 {
    if status.kind == MapKind::ObstacleDenseSmall {
        decision.min_biomass.max(4)
    } else if status.started_small {
        decision.min_biomass.max(3)
    } else {
        decision.min_biomass.max(6)
    }
}

/// Decides whether to found the second facility. `age` is the number of ticks
/// since the first facility appeared.
pub fn second_facility(status: &ColonyStatus, metrics: &TerritoryMetrics, age: u32) -> Option<BuildDecision> {
    if status.actionable == 0 {
        return None;
    }

    let control = metrics.control;
    let nutrients = status.nutrients;

    let build = if status.kind == MapKind::Large {
        (control > 0.12 && nutrients >= 15) || (nutrients >= 20 && age > 12) || age > 25
    } else if status.started_small {
        (control > 0.15 && nutrients >= 10) || (nutrients >= 15 && age > 10)
    } else {
        (control > 0.22 && nutrients >= 18) || (nutrients >= 25 && age > 15)
    };

    build.then(|| BuildDecision::new(status.cost + 2, Urgency::Strict))
}

pub fn second_site_hint(decision: &BuildDecision) -> i32 {
    decision.min_biomass.max(6)
}
