use crate::location::*;
use std::collections::HashMap;

/// Worst-case enemy biomass that can occupy each cell on the next tick.
///
/// An enemy threatens its own cell and every in-bounds cardinal neighbour.
/// Cells absent from the map carry no threat. Rebuilt every tick.
#[derive(Clone, Debug, Default)]
pub struct ThreatMap {
    threat: HashMap<Point, i32>,
}

impl ThreatMap {
    pub fn build<'a, I>(enemies: I, width: i32, height: i32) -> ThreatMap
    where
        I: IntoIterator<Item = (&'a Point, &'a i32)>,
    {
        let mut threat: HashMap<Point, i32> = HashMap::new();

        for (pos, biomass) in enemies {
            let cells = std::iter::once(*pos).chain(pos.neighbours().map(|(_, p)| p));

            for cell in cells.filter(|p| p.in_bounds(width, height)) {
                let entry = threat.entry(cell).or_insert(0);

                if *biomass > *entry {
                    *entry = *biomass;
                }
            }
        }

        ThreatMap { threat }
    }

    pub fn get(&self, pos: Point) -> i32 {
        self.threat.get(&pos).copied().unwrap_or(0)
    }

    /// Strongest threat over `pos` and its cardinal neighbours.
    pub fn local(&self, pos: Point) -> i32 {
        pos.neighbours().map(|(_, p)| self.get(p)).fold(self.get(pos), i32::max)
    }

    pub fn len(&self) -> usize {
        self.threat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threat.is_empty()
    }
}
