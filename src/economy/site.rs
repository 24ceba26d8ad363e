use crate::config::*;
use crate::location::*;
use crate::message::*;
use crate::military::threatmap::*;
use crate::room::classify::*;
use crate::room::data::*;
use crate::selection::*;
use log::*;

/// Inputs shared by every site scored in one selection.
pub struct SiteContext<'a, 'b> {
    pub view: &'a WorldView<'b>,
    pub threat: &'a ThreatMap,
    pub kind: MapKind,
    /// Biomass the builder is expected to carry on arrival.
    pub builder_biomass: i32,
    pub emergency: bool,
    /// Set when placing a second facility; rewards spreading out.
    pub first_facility: Option<Point>,
    pub config: &'a SiteConfig,
}

impl<'a, 'b> SiteContext<'a, 'b> {
    /// Weighted desirability of `pos` as a facility site. Never rejects a cell
    /// outright; unsafe or contested cells just score badly.
    pub fn score(&self, pos: Point) -> i64 {
        let view = self.view;
        let config = self.config;
        let builder = self.builder_biomass;

        let mut score = view.nutrient(pos) as i64 * config.nutrient_weight;

        let mine = view.is_mine(pos);

        if mine {
            score += config.owned_bonus;
        } else if view.biomass(pos) > 0 {
            score -= config.occupied_penalty;
        }

        let threat = self.threat.get(pos);

        if self.emergency {
            score -= if threat >= builder {
                config.emergency_lethal_penalty
            } else {
                threat as i64 * config.emergency_threat_weight
            };
        } else {
            let margin = if builder >= config.strong_builder { config.strong_margin } else { config.weak_margin };

            score -= if threat >= builder - margin { config.lethal_penalty } else { threat as i64 * config.threat_weight };
        }

        let adjacent = view.adjacent_enemy_max(pos);

        if self.emergency {
            score -= adjacent as i64 * config.emergency_adjacent_weight;
        } else if adjacent > 0 && builder <= adjacent {
            score -= config.outmatched_penalty;
        } else {
            score -= adjacent as i64 * config.adjacent_weight;
        }

        let density = view.enemy_density(pos, config.density_radius) as i64;

        let density_weight = if self.kind == MapKind::Large {
            config.large_density_weight
        } else if view.tick() <= config.opening_ticks {
            config.opening_density_weight
        } else if view.tick() <= config.early_ticks {
            config.early_density_weight
        } else {
            config.late_density_weight
        };

        score -= density * density_weight;

        let enemy_distance = view.min_enemy_distance(pos, config.enemy_sample) as i64;
        score += (enemy_distance * config.enemy_distance_weight).min(config.enemy_distance_cap);

        if let Some(first) = self.first_facility {
            score += pos.distance_to(first) as i64 * config.dispersion_weight;
        }

        if view.has_spawner_at(pos) {
            score -= config.facility_penalty;
        }

        score
    }

    /// Best-scoring cell of `candidates`; the first encountered wins ties.
    /// Cells already holding a facility are never chosen.
    pub fn best_of(&self, candidates: &[Point]) -> Selection<(Point, i64)> {
        let mut best: Option<(Point, i64)> = None;

        for pos in candidates.iter().filter(|p| !self.view.has_spawner_at(**p)) {
            let score = self.score(*pos);

            if best.map(|(_, s)| score > s).unwrap_or(true) {
                best = Some((*pos, score));
            }
        }

        best.into()
    }

    /// Picks a site from the ranked pool, falling back to the richest
    /// unclaimed (neutral-owned) cell of the whole ranking.
    pub fn select(&self, ranking: &[Point]) -> Selection<Point> {
        let pool = &ranking[..self.config.candidate_pool.min(ranking.len())];

        self.best_of(pool)
            .map(|(pos, score)| {
                info!("Selected facility site {} (score {})", pos, score);
                pos
            })
            .or_else(|| {
                let fallback = ranking
                    .iter()
                    .copied()
                    .find(|p| self.view.owner(*p) == Some(NEUTRAL_TEAM) && !self.view.has_spawner_at(*p));

                if let Some(pos) = fallback {
                    warn!("No scored facility site, falling back to {}", pos);
                }

                fallback.into()
            })
    }

    /// A locked site stays valid while it is free of facilities, not occupied
    /// by another team, and survivable for the expected builder.
    pub fn still_valid(&self, pos: Point) -> bool {
        let view = self.view;

        if view.has_spawner_at(pos) {
            return false;
        }

        if view.biomass(pos) != 0 && !view.is_mine(pos) {
            return false;
        }

        self.threat.get(pos) < self.builder_biomass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::*;

    fn context<'a, 'b>(view: &'a WorldView<'b>, threat: &'a ThreatMap, config: &'a SiteConfig) -> SiteContext<'a, 'b> {
        SiteContext {
            view,
            threat,
            kind: MapKind::Open,
            builder_biomass: 6,
            emergency: false,
            first_facility: None,
            config,
        }
    }

    #[test]
    fn scores_combine_value_ownership_and_distance() {
        let state = Fixture::new(10, 10).tick(40).nutrient(1, 1, 10).own(1, 1, MY_TEAM).nutrient(2, 2, 10).build();
        let view = WorldView::new(&state).unwrap();
        let threat = ThreatMap::default();
        let config = SiteConfig::default();
        let ctx = context(&view, &threat, &config);

        assert_eq!(ctx.score(Point::new(1, 1)), 50 + 100 + 200);
        assert_eq!(ctx.score(Point::new(2, 2)), 50 + 200);
    }

    #[test]
    fn threat_is_penalized_not_rejected() {
        let state = Fixture::new(10, 10).tick(40).nutrient(4, 4, 90).unit("enemy", ENEMY_TEAM, 4, 5, 5).build();
        let view = WorldView::new(&state).unwrap();
        let threat = ThreatMap::build(view.enemy_biomass(), 10, 10);
        let config = SiteConfig::default();
        let ctx = context(&view, &threat, &config);

        // threat 5 >= 6 - 2, adjacent 5 < 6, one enemy nearby at distance 1.
        assert_eq!(ctx.score(Point::new(4, 4)), 450 - 250 - 100 - 15 + 8);

        let ranking = [Point::new(4, 4), Point::new(0, 0)];
        assert_eq!(ctx.select(&ranking), Selection::Found(Point::new(4, 4)));
    }

    #[test]
    fn selection_skips_facilities_and_is_repeatable() {
        let state = Fixture::new(8, 8)
            .nutrient(3, 3, 50)
            .nutrient(6, 6, 20)
            .spawner("f", MY_TEAM, 3, 3)
            .build();
        let view = WorldView::new(&state).unwrap();
        let threat = ThreatMap::default();
        let config = SiteConfig::default();
        let mut ctx = context(&view, &threat, &config);
        ctx.first_facility = Some(Point::new(3, 3));

        let ranking = [Point::new(3, 3), Point::new(6, 6), Point::new(0, 0)];

        let first = ctx.select(&ranking);
        assert_eq!(first, Selection::Found(Point::new(6, 6)));
        assert_eq!(ctx.select(&ranking), first);
        assert!(!ctx.still_valid(Point::new(3, 3)));
        assert!(ctx.still_valid(Point::new(6, 6)));
    }

    #[test]
    fn fallback_only_takes_neutral_cells() {
        let state = Fixture::new(8, 8)
            .own(1, 1, ENEMY_TEAM)
            .own(2, 2, MY_TEAM)
            .own(3, 3, NEUTRAL_TEAM)
            .build();
        let view = WorldView::new(&state).unwrap();
        let threat = ThreatMap::default();
        let config = SiteConfig {
            candidate_pool: 0,
            ..SiteConfig::default()
        };
        let ctx = context(&view, &threat, &config);

        let ranking = [Point::new(1, 1), Point::new(2, 2), Point::new(3, 3)];

        assert_eq!(ctx.select(&ranking), Selection::Found(Point::new(3, 3)));
        assert_eq!(ctx.select(&ranking[..2]), Selection::NotFound);
    }

    #[test]
    fn site_weights_follow_config() {
        let state = Fixture::new(10, 10).tick(40).nutrient(4, 4, 90).unit("enemy", ENEMY_TEAM, 4, 5, 5).build();
        let view = WorldView::new(&state).unwrap();
        let threat = ThreatMap::build(view.enemy_biomass(), 10, 10);
        let config = SiteConfig {
            lethal_penalty: 1000,
            late_density_weight: 0,
            ..SiteConfig::default()
        };
        let ctx = context(&view, &threat, &config);

        assert_eq!(ctx.score(Point::new(4, 4)), 450 - 1000 - 100 + 8);
    }
}
