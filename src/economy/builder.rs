use crate::actions::*;
use crate::config::*;
use crate::location::*;
use crate::message::*;
use crate::military::threatmap::*;
use crate::room::data::*;
use crate::selection::*;
use itertools::*;
use log::*;

/// Finds the unit that will walk to a site and found a facility there.
pub struct BuilderSearch<'a, 'b> {
    pub view: &'a WorldView<'b>,
    pub threat: &'a ThreatMap,
    pub queue: &'a ActionQueue,
    pub config: &'a BuilderConfig,
}

impl<'a, 'b> BuilderSearch<'a, 'b> {
    fn candidates(&self) -> impl Iterator<Item = &'b Spore> + '_ {
        self.view.actionable_units().into_iter().filter(move |s| self.queue.is_free(&s.id))
    }

    /// Score of `unit` for founding at `site` with `required` biomass. Safety
    /// only shifts the score; no unit is excluded for being threatened.
    fn score(&self, unit: &Spore, site: Point, required: i32, relaxed: bool) -> i64 {
        let config = self.config;
        let distance = unit.position.distance_to(site) as i64;
        let surplus = (unit.biomass - required) as i64;
        let threat = self.threat.get(unit.position);

        let safety = if relaxed {
            if threat < unit.biomass {
                config.comfortable_bonus
            } else {
                0
            }
        } else if threat == 0 {
            config.safe_bonus
        } else if threat < unit.biomass - 2 {
            config.comfortable_bonus
        } else {
            -config.unsafe_penalty
        };

        -distance * config.distance_weight + surplus * config.surplus_weight + safety
    }

    /// Highest-scoring free unit carrying at least `min_biomass`. The relaxed
    /// pass still skips units standing on a lethal cell.
    fn best_scored(&self, site: Point, required: i32, min_biomass: i32, relaxed: bool) -> Selection<&'b Spore> {
        self.candidates()
            .filter(|s| s.biomass >= min_biomass)
            .filter(|s| !relaxed || self.threat.get(s.position) < s.biomass)
            .map(|s| (self.score(s, site, required, relaxed), s))
            .fold(None, |best: Option<(i64, &'b Spore)>, (score, unit)| match best {
                Some((best_score, _)) if best_score >= score => best,
                _ => Some((score, unit)),
            })
            .map(|(_, unit)| unit)
            .into()
    }

    /// Progressive relaxation: a unit that already covers the cost, then any
    /// actionable unit not about to be overrun, then in an emergency simply
    /// the strongest free unit.
    pub fn select(&self, site: Point, required: i32, emergency: bool) -> Selection<&'b Spore> {
        self.best_scored(site, required, required, emergency)
            .or_else(|| self.best_scored(site, required, ACTIONABLE_BIOMASS, true))
            .or_else(|| {
                if emergency {
                    self.candidates().max_set_by_key(|s| s.biomass).into_iter().next().into()
                } else {
                    Selection::NotFound
                }
            })
    }
}

/// Sends the builder to `site`, or founds the facility if it is standing on
/// the site with enough biomass. A builder on site without the biomass is
/// held in place.
pub fn dispatch_builder(queue: &mut ActionQueue, builder: &Spore, site: Point, cost: i32) -> bool {
    if builder.position == site {
        if builder.biomass >= cost {
            info!("Founding facility at {} with {}", site, builder.id);

            queue.create_spawner(&builder.id)
        } else {
            debug!("Builder {} waiting at {} ({} < {})", builder.id, site, builder.biomass, cost);

            queue.reserve(&builder.id, Assignment::BUILDER)
        }
    } else {
        debug!("Builder {} heading to {}", builder.id, site);

        queue.move_unit_to(&builder.id, site, Assignment::BUILDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::*;

    #[test]
    fn prefers_close_unit_covering_cost() {
        let state = Fixture::new(10, 10)
            .unit("far", MY_TEAM, 9, 9, 9)
            .unit("near", MY_TEAM, 2, 1, 5)
            .unit("small", MY_TEAM, 1, 1, 3)
            .build();
        let view = WorldView::new(&state).unwrap();
        let threat = ThreatMap::default();
        let queue = ActionQueue::new();
        let config = BuilderConfig::default();

        let search = BuilderSearch {
            view: &view,
            threat: &threat,
            queue: &queue,
            config: &config,
        };

        let chosen = search.select(Point::new(1, 1), 4, false).found().unwrap();
        assert_eq!(chosen.id, UnitId("near".to_string()));

        let relaxed = search.select(Point::new(1, 1), 20, false).found().unwrap();
        assert_eq!(relaxed.id, UnitId("small".to_string()));
    }

    #[test]
    fn emergency_falls_back_to_strongest() {
        let state = Fixture::new(6, 6)
            .unit("a", MY_TEAM, 0, 0, 3)
            .unit("b", MY_TEAM, 5, 4, 3)
            .unit("enemy", ENEMY_TEAM, 5, 5, 6)
            .build();
        let view = WorldView::new(&state).unwrap();
        let threat = ThreatMap::build(view.enemy_biomass(), 6, 6);
        let mut queue = ActionQueue::new();
        queue.reserve(&UnitId("a".to_string()), Assignment::DEFENDER);
        let config = BuilderConfig::default();

        let search = BuilderSearch {
            view: &view,
            threat: &threat,
            queue: &queue,
            config: &config,
        };

        assert_eq!(search.select(Point::new(0, 1), 4, false), Selection::NotFound);
        assert_eq!(search.select(Point::new(0, 1), 4, true).found().map(|s| s.id.clone()), Some(UnitId("b".to_string())));
    }

    #[test]
    fn builder_on_site_founds_only_with_cost() {
        let rich = Spore {
            id: UnitId("r".to_string()),
            team_id: MY_TEAM,
            biomass: 6,
            position: Point::new(2, 2),
        };
        let poor = Spore {
            id: UnitId("p".to_string()),
            team_id: MY_TEAM,
            biomass: 3,
            position: Point::new(2, 2),
        };

        let mut queue = ActionQueue::new();

        assert!(dispatch_builder(&mut queue, &rich, Point::new(2, 2), 4));
        assert!(dispatch_builder(&mut queue, &poor, Point::new(2, 2), 4));
        assert!(matches!(queue.actions(), [Action::SporeCreateSpawner { .. }]));
        assert!(queue.has_role(&poor.id, Assignment::BUILDER));
    }
}
