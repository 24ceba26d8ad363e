use crate::location::*;
use crate::message::*;
use bitflags::*;
use std::collections::{HashMap, HashSet};

bitflags! {
    /// What a unit has been committed to this tick. A unit holds at most one
    /// action; the flags record why it was taken out of the free pool.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Assignment: u8 {
        const BUILDER  = 1;
        const HUNTER   = 1 << 1;
        const DEFENDER = 1 << 2;
        const SPLIT    = 1 << 3;
        const MERGE    = 1 << 4;
        const EXPLORER = 1 << 5;
    }
}

/// Actions committed this tick, in emission order.
///
/// Enforces at most one action per unit and per facility; a second request for
/// an already assigned id is refused rather than replacing the first.
#[derive(Default)]
pub struct ActionQueue {
    actions: Vec<Action>,
    units: HashMap<UnitId, Assignment>,
    spawners: HashSet<SpawnerId>,
}

impl ActionQueue {
    pub fn new() -> ActionQueue {
        ActionQueue::default()
    }

    pub fn is_free(&self, unit: &UnitId) -> bool {
        !self.units.contains_key(unit)
    }

    pub fn assignment(&self, unit: &UnitId) -> Option<Assignment> {
        self.units.get(unit).copied()
    }

    pub fn has_role(&self, unit: &UnitId, role: Assignment) -> bool {
        self.assignment(unit).map(|a| a.contains(role)).unwrap_or(false)
    }

    pub fn spawner_used(&self, spawner: &SpawnerId) -> bool {
        self.spawners.contains(spawner)
    }

    /// Takes a unit out of the free pool without emitting an action for it.
    /// Returns false if the unit was already assigned.
    pub fn reserve(&mut self, unit: &UnitId, role: Assignment) -> bool {
        if self.units.contains_key(unit) {
            return false;
        }

        self.units.insert(unit.clone(), role);

        true
    }

    /// Whether `unit` may still be given an action in `role`: either it is
    /// free, or it was reserved for that role and has not acted yet.
    pub fn can_act(&self, unit: &UnitId, role: Assignment) -> bool {
        match self.units.get(unit) {
            Some(existing) => existing.contains(role) && !self.has_action(unit),
            None => true,
        }
    }

    fn push_unit(&mut self, unit: &UnitId, role: Assignment, action: Action) -> bool {
        if !self.can_act(unit, role) {
            return false;
        }

        self.units.entry(unit.clone()).or_insert(role);
        self.actions.push(action);

        true
    }

    fn has_action(&self, unit: &UnitId) -> bool {
        self.actions.iter().any(|a| a.unit_id() == Some(unit))
    }

    pub fn move_unit(&mut self, unit: &UnitId, direction: Direction, role: Assignment) -> bool {
        self.push_unit(
            unit,
            role,
            Action::SporeMove {
                spore_id: unit.clone(),
                direction,
            },
        )
    }

    pub fn move_unit_to(&mut self, unit: &UnitId, position: Point, role: Assignment) -> bool {
        self.push_unit(
            unit,
            role,
            Action::SporeMoveTo {
                spore_id: unit.clone(),
                position,
            },
        )
    }

    pub fn create_spawner(&mut self, unit: &UnitId) -> bool {
        self.push_unit(unit, Assignment::BUILDER, Action::SporeCreateSpawner { spore_id: unit.clone() })
    }

    pub fn split(&mut self, unit: &UnitId, biomass_for_moving_spore: i32, direction: Direction) -> bool {
        self.push_unit(
            unit,
            Assignment::SPLIT,
            Action::SporeSplit {
                spore_id: unit.clone(),
                biomass_for_moving_spore,
                direction,
            },
        )
    }

    pub fn produce(&mut self, spawner: &SpawnerId, biomass: i32) -> bool {
        if !self.spawners.insert(spawner.clone()) {
            return false;
        }

        self.actions.push(Action::SpawnerProduceSpore {
            spawner_id: spawner.clone(),
            biomass,
        });

        true
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: &str) -> UnitId {
        UnitId(id.to_string())
    }

    #[test]
    fn second_action_for_unit_is_refused() {
        let mut queue = ActionQueue::new();

        assert!(queue.move_unit(&unit("a"), Direction::Up, Assignment::EXPLORER));
        assert!(!queue.move_unit_to(&unit("a"), Point::new(1, 1), Assignment::HUNTER));
        assert!(!queue.create_spawner(&unit("a")));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn reserved_unit_can_act_only_in_its_role() {
        let mut queue = ActionQueue::new();

        assert!(queue.reserve(&unit("b"), Assignment::BUILDER));
        assert!(!queue.is_free(&unit("b")));
        assert!(!queue.move_unit(&unit("b"), Direction::Left, Assignment::EXPLORER));
        assert!(queue.move_unit_to(&unit("b"), Point::new(2, 2), Assignment::BUILDER));
        assert!(!queue.create_spawner(&unit("b")));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn spawner_produces_once() {
        let mut queue = ActionQueue::new();
        let spawner = SpawnerId("f".to_string());

        assert!(queue.produce(&spawner, 4));
        assert!(!queue.produce(&spawner, 6));
        assert_eq!(queue.into_actions().len(), 1);
    }
}
