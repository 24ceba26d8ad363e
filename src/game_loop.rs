use crate::actions::*;
use crate::config::*;
use crate::economy::facility::*;
use crate::economy::production::*;
use crate::economy::split::*;
use crate::location::*;
use crate::message::*;
use crate::military::combat::*;
use crate::military::defense::*;
use crate::military::threatmap::*;
use crate::pathing::history::*;
use crate::pathing::lanes::*;
use crate::pathing::movement::*;
use crate::pathing::search::*;
use crate::room::classify::*;
use crate::room::data::*;
use crate::room::territory::*;
use crate::room::tiles::*;
use crate::timing::*;
use log::*;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;

/// Pipeline stages, in execution order. The deadline is checked on entry to each.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Facilities,
    Production,
    Combat,
    Defense,
    Splits,
    Movement,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Runs the observer for `phase` and reports whether the phase may run.
fn enter<F>(phase: Phase, deadline: &mut Deadline, observer: &mut F) -> bool
where
    F: FnMut(Phase, &mut Deadline),
{
    observer(phase, deadline);

    if deadline.expired() {
        debug!("Tick budget exhausted before {}", phase);
        return false;
    }

    true
}

/// Decision engine for one team. Holds the state carried between ticks; all
/// per-tick state is rebuilt from the snapshot.
pub struct Engine {
    config: EngineConfig,
    tiles: TopTiles,
    classifier: MapClassifier,
    territory: TerritoryCache,
    stagnation: StagnationTracker,
    facilities: FacilityPlanner,
    lanes: LanePlanner,
    history: PositionHistory,
    initial_units: Option<usize>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Engine {
        Engine {
            config,
            tiles: TopTiles::new(),
            classifier: MapClassifier::new(),
            territory: TerritoryCache::new(),
            stagnation: StagnationTracker::new(),
            facilities: FacilityPlanner::new(),
            lanes: LanePlanner::new(),
            history: PositionHistory::new(),
            initial_units: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn map_kind(&self) -> Option<MapKind> {
        self.classifier.cached()
    }

    pub fn is_stagnant(&self) -> bool {
        self.stagnation.is_stagnant(&self.config.territory)
    }

    pub fn planned_site(&self, slot: SiteSlot) -> Option<Point> {
        self.facilities.planned_site(slot)
    }

    pub fn tick(&mut self, state: &TeamGameState) -> Vec<Action> {
        self.tick_observed(state, |_, _| {})
    }

    /// Like `tick`, calling `observer` on entry to every phase.
    pub fn tick_observed<F>(&mut self, state: &TeamGameState, mut observer: F) -> Vec<Action>
    where
        F: FnMut(Phase, &mut Deadline),
    {
        let mut deadline = Deadline::start(self.config.timing.tick_budget());

        scope_timing!("Tick {}", state.tick);

        let view = match WorldView::new(state) {
            Ok(view) => view,
            Err(err) => {
                warn!("Skipping tick {}: {}", state.tick, err);
                return Vec::new();
            }
        };

        for error in view.last_tick_errors() {
            warn!("Engine rejected an action on tick {}: {}", state.tick.saturating_sub(1), error);
        }

        let tick = view.tick();
        let config = &self.config;

        if tick <= 1 && self.initial_units.is_none() {
            self.initial_units = Some(view.units().len());
        }

        let started_small = self.initial_units.unwrap_or(3) <= 3;

        //
        // Shared per-tick analysis
        //

        self.tiles.ensure(&view, view.width(), view.height(), config.map.top_tiles);

        let kind = self.classifier.classify(&view, &config.map);
        let metrics = self.territory.update(&view, &config.territory);
        let stagnant = self.stagnation.observe(tick, metrics.tiles, &config.territory);
        let threat = ThreatMap::build(view.enemy_biomass(), view.width(), view.height());

        if !threat.is_empty() {
            debug!("{} cells under threat", threat.len());
        }
        let center = colony_center(&view);
        let use_lanes = kind.uses_lanes() || stagnant;

        if use_lanes {
            self.lanes.refresh_targets(&view, &threat, &self.tiles, center, stagnant, &config.lanes);
        }

        let facility_count = view.spawners().len();
        let unit_count = view.units().len();
        let penalty = two_biomass_penalty(kind, tick, &metrics, facility_count, stagnant);

        self.history.update(view.units());

        let live: HashSet<UnitId> = view.units().iter().map(|s| s.id.clone()).collect();
        self.lanes.sweep(&live);

        let survival = (facility_count == 0 && unit_count <= 2) || (facility_count >= 1 && unit_count <= 1);

        if survival {
            debug!("Survival mode: {} facilities, {} units", facility_count, unit_count);
        }

        let mut queue = ActionQueue::new();

        //
        // Facilities
        //

        if enter(Phase::Facilities, &mut deadline, &mut observer) {
            scope_timing!("Facilities");

            let ctx = FacilityContext {
                view: &view,
                threat: &threat,
                tiles: &self.tiles,
                kind,
                metrics,
                started_small,
                config,
            };

            self.facilities.run(&ctx, &mut queue);
        }

        //
        // Production
        //

        if enter(Phase::Production, &mut deadline, &mut observer) {
            scope_timing!("Production");

            let status = ProductionStatus {
                tick,
                units: unit_count,
                nutrients: view.nutrients(),
                metrics,
                stagnant,
            };

            run_production(&view, &threat, status, started_small, &mut queue);
        }

        //
        // Combat
        //

        let mut hunters = Vec::new();

        if enter(Phase::Combat, &mut deadline, &mut observer) && !survival {
            scope_timing!("Combat");

            let opportunities = find_targets(&view, &queue, &config.combat);

            hunters = commit_targets(opportunities, &mut queue, &config.combat);
        }

        //
        // Defense
        //

        let mut defenders = Defenders::default();

        if enter(Phase::Defense, &mut deadline, &mut observer) {
            scope_timing!("Defense");

            defenders = assign_defenders(&view, &threat, &mut queue, &config.combat);

            if !defenders.is_empty() {
                debug!("{} defenders assigned", defenders.len());
            }
        }

        //
        // Splits
        //

        if enter(Phase::Splits, &mut deadline, &mut observer) && !survival && !deadline.below(config.timing.split_reserve()) {
            scope_timing!("Splits");

            attempt_split(&view, &threat, &mut queue, &config.splits);
        }

        //
        // Movement
        //

        if enter(Phase::Movement, &mut deadline, &mut observer) {
            scope_timing!("Movement");

            let mut units = view.actionable_units();
            units.sort_by_key(|s| Reverse(s.biomass));

            let ctx = SearchContext {
                view: &view,
                threat: &threat,
                center,
                stagnant,
                lanes_active: use_lanes,
                two_biomass_penalty: penalty,
                pioneer_penalty: pioneer_penalty(penalty),
                config: &config.search,
            };

            if !deadline.below(config.timing.merge_reserve()) {
                emergency_merge(&ctx, &units, &mut queue, &deadline, config);
            }

            let plan = MovementPlan {
                defenders: &defenders,
                hunters: &hunters,
                use_lanes,
                survival,
                facilities: facility_count,
                actionable: units.len(),
            };

            move_units(&ctx, &plan, &units, &mut self.lanes, &self.history, &mut queue, &deadline, config);
        }

        debug!(
            "Tick {}: {} actions for {} units in {:?} ({})",
            tick,
            queue.len(),
            unit_count,
            deadline.elapsed(),
            kind
        );

        queue.into_actions()
    }
}
