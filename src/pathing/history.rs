use crate::location::*;
use crate::message::*;
use std::collections::{HashMap, HashSet, VecDeque};

const HISTORY_LENGTH: usize = 4;

/// Recent positions per unit, used to discourage stepping straight back.
///
/// Entries for units missing from the latest snapshot are swept on every
/// update, so the map never outlives the units it tracks.
#[derive(Default)]
pub struct PositionHistory {
    positions: HashMap<UnitId, VecDeque<Point>>,
}

impl PositionHistory {
    pub fn new() -> PositionHistory {
        PositionHistory::default()
    }

    pub fn update<'a, I>(&mut self, units: I)
    where
        I: IntoIterator<Item = &'a Spore>,
    {
        let mut live = HashSet::new();

        for unit in units {
            let history = self.positions.entry(unit.id.clone()).or_default();

            if history.len() == HISTORY_LENGTH {
                history.pop_front();
            }

            history.push_back(unit.position);
            live.insert(unit.id.clone());
        }

        self.positions.retain(|id, _| live.contains(id));
    }

    /// Where the unit stood on the previous tick.
    pub fn previous(&self, unit: &UnitId) -> Option<Point> {
        let history = self.positions.get(unit)?;

        if history.len() < 2 {
            return None;
        }

        history.get(history.len() - 2).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spore(id: &str, x: i32, y: i32) -> Spore {
        Spore {
            id: UnitId(id.to_string()),
            team_id: 1,
            biomass: 3,
            position: Point::new(x, y),
        }
    }

    #[test]
    fn remembers_previous_position_and_sweeps_dead_units() {
        let mut history = PositionHistory::new();

        history.update(&[spore("a", 0, 0), spore("b", 5, 5)]);
        assert_eq!(history.previous(&UnitId("a".to_string())), None);

        history.update(&[spore("a", 1, 0)]);
        assert_eq!(history.previous(&UnitId("a".to_string())), Some(Point::new(0, 0)));
        assert_eq!(history.len(), 1);

        for x in 2..8 {
            history.update(&[spore("a", x, 0)]);
        }

        assert_eq!(history.previous(&UnitId("a".to_string())), Some(Point::new(6, 0)));
    }
}
