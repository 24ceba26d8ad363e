use super::builder::*;
use super::planner::*;
use super::site::*;
use crate::actions::*;
use crate::config::*;
use crate::location::*;
use crate::military::threatmap::*;
use crate::room::classify::*;
use crate::room::data::*;
use crate::room::territory::*;
use crate::room::tiles::*;
use crate::selection::*;
use log::*;
use std::collections::HashMap;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SiteSlot {
    First,
    Second,
}

/// Per-tick inputs of the facility phase.
pub struct FacilityContext<'a, 'b> {
    pub view: &'a WorldView<'b>,
    pub threat: &'a ThreatMap,
    pub tiles: &'a TopTiles,
    pub kind: MapKind,
    pub metrics: TerritoryMetrics,
    pub started_small: bool,
    pub config: &'a EngineConfig,
}

impl<'a, 'b> FacilityContext<'a, 'b> {
    fn status(&self) -> ColonyStatus {
        let actionable = self.view.actionable_units();

        ColonyStatus {
            kind: self.kind,
            tick: self.view.tick(),
            actionable: actionable.len(),
            max_biomass: actionable.iter().map(|s| s.biomass).max().unwrap_or(0),
            cost: self.view.next_spawner_cost(),
            nutrients: self.view.nutrients(),
            started_small: self.started_small,
        }
    }
}

/// Plans the first and second facility. Chosen sites stay locked across ticks
/// until they become unusable, so builders do not chase a moving target.
#[derive(Default)]
pub struct FacilityPlanner {
    planned: HashMap<SiteSlot, Point>,
    first_facility_tick: Option<u32>,
}

impl FacilityPlanner {
    pub fn new() -> FacilityPlanner {
        FacilityPlanner::default()
    }

    pub fn planned_site(&self, slot: SiteSlot) -> Option<Point> {
        self.planned.get(&slot).copied()
    }

    /// Commits at most one builder action. Returns the planned slot when a
    /// builder was dispatched.
    pub fn run(&mut self, ctx: &FacilityContext, queue: &mut ActionQueue) -> Option<SiteSlot> {
        let facilities = ctx.view.spawners().len();

        if facilities > 0 && self.first_facility_tick.is_none() {
            self.first_facility_tick = Some(ctx.view.tick());
        }

        let status = ctx.status();

        let (slot, decision, hint, first) = match facilities {
            0 => {
                let decision = first_facility(&status, &ctx.config.planner)?;

                (SiteSlot::First, decision, first_site_hint(&status, &decision), None)
            }
            1 => {
                let age = ctx.view.tick().saturating_sub(self.first_facility_tick.unwrap_or(0));
                let decision = second_facility(&status, &ctx.metrics, age)?;

                (SiteSlot::Second, decision, second_site_hint(&decision), ctx.view.spawner_points().first().copied())
            }
            _ => return None,
        };

        let site_context = SiteContext {
            view: ctx.view,
            threat: ctx.threat,
            kind: ctx.kind,
            builder_biomass: hint,
            emergency: decision.is_emergency(),
            first_facility: first,
            config: &ctx.config.site,
        };

        let site = match self.planned_site(slot).filter(|p| site_context.still_valid(*p)) {
            Some(site) => site,
            None => {
                self.planned.remove(&slot);

                let site = site_context.select(ctx.tiles.tiles()).found()?;
                self.planned.insert(slot, site);

                site
            }
        };

        let search = BuilderSearch {
            view: ctx.view,
            threat: ctx.threat,
            queue,
            config: &ctx.config.builder,
        };

        let builder = match search.select(site, decision.min_biomass, decision.is_emergency()) {
            Selection::Found(builder) => builder,
            Selection::NotFound => {
                debug!("No builder for {:?} facility at {}", slot, site);
                return None;
            }
        };

        info!(
            "{:?} facility: {} -> {} ({:?}, needs {})",
            slot, builder.id, site, decision.urgency, decision.min_biomass
        );

        dispatch_builder(queue, builder, site, ctx.view.next_spawner_cost()).then_some(slot)
    }
}
