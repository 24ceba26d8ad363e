use super::classify::*;
use super::data::*;
use crate::config::*;
use log::*;

/// Owned tile count and summed nutrient generation, rescanned periodically.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TerritoryMetrics {
    pub tiles: usize,
    pub generation: i64,
    /// Owned share of the map in `[0, 1]`.
    pub control: f32,
}

#[derive(Default)]
pub struct TerritoryCache {
    metrics: TerritoryMetrics,
    last_scan: Option<u32>,
}

impl TerritoryCache {
    pub fn new() -> TerritoryCache {
        TerritoryCache::default()
    }

    pub fn update(&mut self, view: &WorldView, config: &TerritoryConfig) -> TerritoryMetrics {
        let tick = view.tick();

        let due = match self.last_scan {
            Some(last) => tick <= 3 || tick.saturating_sub(last) >= config.rescan_interval || tick < last,
            None => true,
        };

        if due {
            let (tiles, generation) = view.scan_territory();
            let area = view.area().max(1) as f32;

            self.metrics = TerritoryMetrics {
                tiles,
                generation,
                control: tiles as f32 / area,
            };
            self.last_scan = Some(tick);
        }

        self.metrics
    }
}

// ---------------------------------------------------------------------------
// Stagnation
// ---------------------------------------------------------------------------

/// Detects territory growth stalling over fixed check intervals.
#[derive(Default)]
pub struct StagnationTracker {
    last_territory: usize,
    stalled_ticks: u32,
}

impl StagnationTracker {
    pub fn new() -> StagnationTracker {
        StagnationTracker::default()
    }

    pub fn stalled_ticks(&self) -> u32 {
        self.stalled_ticks
    }

    pub fn is_stagnant(&self, config: &TerritoryConfig) -> bool {
        self.stalled_ticks >= config.stagnation_ticks
    }

    /// Feeds the current territory size; only ticks on the check interval count.
    pub fn observe(&mut self, tick: u32, territory: usize, config: &TerritoryConfig) -> bool {
        let was_stagnant = self.is_stagnant(config);

        if config.stagnation_interval > 0 && tick % config.stagnation_interval == 0 {
            if territory <= self.last_territory + config.stagnation_growth {
                self.stalled_ticks += config.stagnation_interval;
            } else {
                self.stalled_ticks = 0;
            }

            self.last_territory = territory;
        }

        let stagnant = self.is_stagnant(config);

        if stagnant && !was_stagnant {
            info!("Territory stagnant at {} tiles on tick {} after {} stalled ticks", territory, tick, self.stalled_ticks());
        }

        stagnant
    }
}

// ---------------------------------------------------------------------------
// Immobilization penalty
// ---------------------------------------------------------------------------

/// Penalty for a 2-biomass unit stepping off its trail, where it would be
/// left with a single biomass and unable to act again. Grows as the game
/// matures and cheap units matter less.
pub fn two_biomass_penalty(kind: MapKind, tick: u32, metrics: &TerritoryMetrics, facilities: usize, stagnant: bool) -> i64 {
    if stagnant {
        return 50;
    }

    if tick < 100 {
        return if metrics.generation < 10 {
            80
        } else if kind == MapKind::ObstacleDenseSmall {
            120
        } else {
            150
        };
    }

    if tick < 300 {
        return if metrics.generation < 20 {
            150
        } else if metrics.control < 0.25 {
            200
        } else {
            350
        };
    }

    if tick < 600 {
        return if metrics.control < 0.4 { 300 } else { 500 };
    }

    if facilities >= 2 {
        800
    } else {
        600
    }
}

/// Reduced penalty for pioneers pushing toward a distant lane target.
pub fn pioneer_penalty(penalty: i64) -> i64 {
    (penalty / 3).max(20)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::*;

    #[test]
    fn stagnation_accumulates_on_check_ticks() {
        let config = TerritoryConfig::default();
        let mut tracker = StagnationTracker::new();

        assert!(!tracker.observe(20, 5, &config));
        assert!(!tracker.observe(21, 5, &config));
        assert!(!tracker.observe(40, 6, &config));
        assert_eq!(tracker.stalled_ticks(), 20);
        assert!(tracker.observe(60, 7, &config));

        assert!(!tracker.observe(80, 20, &config));
        assert_eq!(tracker.stalled_ticks(), 0);
    }

    #[test]
    fn metrics_rescan_on_interval() {
        let config = TerritoryConfig::default();
        let mut cache = TerritoryCache::new();

        let first = Fixture::new(4, 4).tick(10).own(0, 0, MY_TEAM).nutrient(0, 0, 7).build();
        let metrics = cache.update(&WorldView::new(&first).unwrap(), &config);

        assert_eq!(metrics.tiles, 1);
        assert_eq!(metrics.generation, 7);
        assert_eq!(metrics.control, 1.0 / 16.0);

        let grown = Fixture::new(4, 4).tick(12).own(0, 0, MY_TEAM).own(1, 0, MY_TEAM).build();
        assert_eq!(cache.update(&WorldView::new(&grown).unwrap(), &config).tiles, 1);

        let later = Fixture::new(4, 4).tick(15).own(0, 0, MY_TEAM).own(1, 0, MY_TEAM).build();
        assert_eq!(cache.update(&WorldView::new(&later).unwrap(), &config).tiles, 2);
    }

    #[test]
    fn penalty_follows_game_phase() {
        let rich = TerritoryMetrics {
            tiles: 100,
            generation: 50,
            control: 0.5,
        };

        assert_eq!(two_biomass_penalty(MapKind::Open, 50, &rich, 1, true), 50);
        assert_eq!(two_biomass_penalty(MapKind::Open, 50, &TerritoryMetrics::default(), 1, false), 80);
        assert_eq!(two_biomass_penalty(MapKind::ObstacleDenseSmall, 50, &rich, 1, false), 120);
        assert_eq!(two_biomass_penalty(MapKind::Open, 200, &rich, 1, false), 350);
        assert_eq!(two_biomass_penalty(MapKind::Open, 400, &rich, 1, false), 500);
        assert_eq!(two_biomass_penalty(MapKind::Large, 900, &rich, 2, false), 800);
        assert_eq!(pioneer_penalty(150), 50);
        assert_eq!(pioneer_penalty(50), 20);
    }
}
