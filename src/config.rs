//! Tunables for the decision engine.
//!
//! Every value here was tuned empirically against live matches. They are
//! grouped by the subsystem that reads them and can be overridden from a JSON
//! file; missing keys fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub timing: TimingConfig,
    pub map: MapConfig,
    pub territory: TerritoryConfig,
    pub planner: PlannerConfig,
    pub site: SiteConfig,
    pub builder: BuilderConfig,
    pub combat: CombatConfig,
    pub lanes: LaneConfig,
    pub search: SearchConfig,
    pub movement: MovementConfig,
    pub splits: SplitConfig,
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<EngineConfig, String> {
        let contents = fs::read_to_string(path).map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;

        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Wall-clock budget for one tick.
    pub tick_budget_ms: u64,
    /// Remaining time below which splits are no longer attempted.
    pub split_reserve_ms: u64,
    /// Remaining time below which the emergency merge pass is skipped.
    pub merge_reserve_ms: u64,
    /// Remaining time below which no further unit is merged.
    pub merge_step_reserve_ms: u64,
    /// Remaining time below which individual units are no longer moved.
    pub movement_reserve_ms: u64,
}

impl TimingConfig {
    pub fn tick_budget(&self) -> Duration {
        Duration::from_millis(self.tick_budget_ms)
    }

    pub fn split_reserve(&self) -> Duration {
        Duration::from_millis(self.split_reserve_ms)
    }

    pub fn merge_reserve(&self) -> Duration {
        Duration::from_millis(self.merge_reserve_ms)
    }

    pub fn merge_step_reserve(&self) -> Duration {
        Duration::from_millis(self.merge_step_reserve_ms)
    }

    pub fn movement_reserve(&self) -> Duration {
        Duration::from_millis(self.movement_reserve_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            tick_budget_ms: 85,
            split_reserve_ms: 10,
            merge_reserve_ms: 5,
            merge_step_reserve_ms: 3,
            movement_reserve_ms: 2,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub small_area: i32,
    pub medium_area: i32,
    /// Chebyshev radius around the grid center counted as "central".
    pub center_radius: i32,
    pub dense_center_neutrals: usize,
    pub dense_total_neutrals: usize,
    /// Number of highest-nutrient cells kept in the cached ranking.
    pub top_tiles: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            small_area: 225,
            medium_area: 900,
            center_radius: 3,
            dense_center_neutrals: 5,
            dense_total_neutrals: 8,
            top_tiles: 400,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TerritoryConfig {
    /// Ticks between full ownership rescans.
    pub rescan_interval: u32,
    /// Ticks between stagnation checks.
    pub stagnation_interval: u32,
    /// Territory growth at or below this per interval counts as stalled.
    pub stagnation_growth: usize,
    /// Accumulated stalled ticks before the colony is considered stagnant.
    pub stagnation_ticks: u32,
}

impl Default for TerritoryConfig {
    fn default() -> Self {
        TerritoryConfig {
            rescan_interval: 5,
            stagnation_interval: 20,
            stagnation_growth: 2,
            stagnation_ticks: 40,
        }
    }
}

/// Last tick of the strict and relaxed tiers of the first-facility schedule.
/// Later ticks force the build.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct TierSchedule {
    pub strict_until: u32,
    pub relaxed_until: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub open: TierSchedule,
    pub dense: TierSchedule,
    /// Medium and large maps.
    pub wide: TierSchedule,
    /// From this tick the first facility is always forced.
    pub pressure_tick: u32,
    /// From this tick a colony of at most `lonely_units` forces the build.
    pub lonely_pressure_tick: u32,
    pub lonely_units: usize,
    /// From this tick a unit holding twice the cost forces the build.
    pub rich_pressure_tick: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            open: TierSchedule {
                strict_until: 6,
                relaxed_until: 12,
            },
            dense: TierSchedule {
                strict_until: 8,
                relaxed_until: 15,
            },
            wide: TierSchedule {
                strict_until: 5,
                relaxed_until: 12,
            },
            pressure_tick: 18,
            lonely_pressure_tick: 12,
            lonely_units: 2,
            rich_pressure_tick: 10,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Prefix of the nutrient ranking scored for a new facility.
    pub candidate_pool: usize,
    pub nutrient_weight: i64,
    pub owned_bonus: i64,
    pub occupied_penalty: i64,
    pub enemy_distance_weight: i64,
    pub enemy_distance_cap: i64,
    pub density_radius: i32,
    pub dispersion_weight: i64,
    pub facility_penalty: i64,
    /// Enemies beyond this prefix of the strength-sorted list are ignored for distance.
    pub enemy_sample: usize,
    /// Threat penalties for emergency builds: flat when lethal, per biomass otherwise.
    pub emergency_lethal_penalty: i64,
    pub emergency_threat_weight: i64,
    pub lethal_penalty: i64,
    pub threat_weight: i64,
    /// Builders of at least this biomass keep `strong_margin` of headroom over threat.
    pub strong_builder: i32,
    pub strong_margin: i32,
    pub weak_margin: i32,
    /// Applied when an adjacent enemy matches or beats the builder.
    pub outmatched_penalty: i64,
    pub adjacent_weight: i64,
    pub emergency_adjacent_weight: i64,
    pub large_density_weight: i64,
    pub opening_density_weight: i64,
    pub opening_ticks: u32,
    pub early_density_weight: i64,
    pub early_ticks: u32,
    pub late_density_weight: i64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            candidate_pool: 80,
            nutrient_weight: 5,
            owned_bonus: 100,
            occupied_penalty: 500,
            enemy_distance_weight: 8,
            enemy_distance_cap: 200,
            density_radius: 5,
            dispersion_weight: 6,
            facility_penalty: 10_000,
            enemy_sample: 60,
            emergency_lethal_penalty: 400,
            emergency_threat_weight: 15,
            lethal_penalty: 250,
            threat_weight: 25,
            strong_builder: 6,
            strong_margin: 2,
            weak_margin: 1,
            outmatched_penalty: 200,
            adjacent_weight: 20,
            emergency_adjacent_weight: 10,
            large_density_weight: 10,
            opening_density_weight: 40,
            opening_ticks: 15,
            early_density_weight: 25,
            early_ticks: 30,
            late_density_weight: 15,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub distance_weight: i64,
    pub surplus_weight: i64,
    pub safe_bonus: i64,
    pub comfortable_bonus: i64,
    pub unsafe_penalty: i64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            distance_weight: 100,
            surplus_weight: 5,
            safe_bonus: 100,
            comfortable_bonus: 50,
            unsafe_penalty: 100,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub enemy_range: i32,
    pub neutral_range: i32,
    /// Attacker must exceed enemy biomass by more than this.
    pub enemy_margin: i32,
    pub max_targets: usize,
    pub profit_threshold: i32,
    pub adjacent_defender_biomass: i32,
    pub defender_margin: i32,
    /// Defenders this close to their facility and unthreatened hold position.
    pub guard_radius: i32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        CombatConfig {
            enemy_range: 10,
            neutral_range: 8,
            enemy_margin: 1,
            max_targets: 5,
            profit_threshold: 20,
            adjacent_defender_biomass: 4,
            defender_margin: 2,
            guard_radius: 2,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    pub ttl: u32,
    pub stagnant_ttl: u32,
    pub scan: usize,
    pub stagnant_scan: usize,
    pub assignment_ttl: u32,
    pub max_threat: i32,
    pub home_radius: i32,
    pub nutrient_weight: i64,
    pub distance_weight: i64,
    pub stagnant_distance_weight: i64,
    pub unclaimed_bonus: i64,
}

impl Default for LaneConfig {
    fn default() -> Self {
        LaneConfig {
            ttl: 10,
            stagnant_ttl: 18,
            scan: 110,
            stagnant_scan: 140,
            assignment_ttl: 25,
            max_threat: 8,
            home_radius: 3,
            nutrient_weight: 6,
            distance_weight: 14,
            stagnant_distance_weight: 22,
            unclaimed_bonus: 120,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub min_depth: u32,
    pub max_depth: u32,
    pub min_nodes: usize,
    pub max_nodes: usize,
    /// Units searched per tick with a full budget; shrinks with the budget.
    pub max_units: usize,
    pub min_units: usize,
    /// Manhattan radius of the reachable-cell fallback.
    pub fallback_radius: i32,
    pub backtrack_penalty: i64,
    pub crowding_penalty: i64,
    pub trail_bonus: i64,
    pub path_cost_penalty: i64,
    pub distance_penalty: i64,
    pub home_penalty: i64,
    pub pioneer_distance: i32,
    /// Reward for overrunning a weaker enemy, plus a bonus per biomass of margin.
    pub kill_bonus: i64,
    pub kill_margin_weight: i64,
    pub threat_penalty: i64,
    pub adjacent_penalty: i64,
    /// Per-step pull toward a defender's facility or a hunter's target.
    pub approach_weight: i64,
    pub guard_owned_bonus: i64,
    pub explore_nutrient_weight: i64,
    pub unclaimed_bonus: i64,
    pub lane_progress_weight: i64,
    pub stagnant_lane_progress_weight: i64,
    pub outward_weight: i64,
    pub stagnant_outward_weight: i64,
    /// Applied to fallback steps onto lethal cells when standing still is lethal too.
    pub desperate_penalty: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            min_depth: 4,
            max_depth: 7,
            min_nodes: 120,
            max_nodes: 250,
            max_units: 60,
            min_units: 8,
            fallback_radius: 12,
            backtrack_penalty: 220,
            crowding_penalty: 20,
            trail_bonus: 15,
            path_cost_penalty: 25,
            distance_penalty: 8,
            home_penalty: 90,
            pioneer_distance: 5,
            kill_bonus: 450,
            kill_margin_weight: 5,
            threat_penalty: 30,
            adjacent_penalty: 20,
            approach_weight: 35,
            guard_owned_bonus: 30,
            explore_nutrient_weight: 4,
            unclaimed_bonus: 120,
            lane_progress_weight: 18,
            stagnant_lane_progress_weight: 26,
            outward_weight: 12,
            stagnant_outward_weight: 18,
            desperate_penalty: 1000,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Endangered units considered by one emergency merge pass.
    pub merge_candidates: usize,
    /// Manhattan reach within which a stronger friend is sought.
    pub merge_range: i32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        MovementConfig {
            merge_candidates: 3,
            merge_range: 3,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub enabled: bool,
    pub min_biomass: i32,
    pub max_colony: usize,
    pub candidates: usize,
    /// Best neighbour score required before a unit splits.
    pub min_score: i64,
    pub unclaimed_bonus: i64,
    pub threat_weight: i64,
    pub adjacent_weight: i64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            enabled: true,
            min_biomass: 6,
            max_colony: 18,
            candidates: 3,
            min_score: 35,
            unclaimed_bonus: 30,
            threat_weight: 40,
            adjacent_weight: 30,
        }
    }
}
