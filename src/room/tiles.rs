use super::data::*;
use crate::location::*;
use log::*;

/// Highest-nutrient cells of the map, best first.
///
/// Nutrient values are static for a match so the ranking is computed once and
/// reused until the grid dimensions change.
#[derive(Default)]
pub struct TopTiles {
    dimensions: Option<(i32, i32)>,
    tiles: Vec<Point>,
}

impl TopTiles {
    pub fn new() -> TopTiles {
        TopTiles::default()
    }

    pub fn ensure<T: TileQuery>(&mut self, tiles: &T, width: i32, height: i32, limit: usize) {
        if self.dimensions == Some((width, height)) && !self.tiles.is_empty() {
            return;
        }

        let mut points: Vec<Point> = (0..height).flat_map(|y| (0..width).map(move |x| Point::new(x, y))).collect();

        // Stable sort keeps row-major order among equal nutrient values.
        points.sort_by_key(|p| -tiles.nutrient(*p));
        points.truncate(limit);

        debug!("Ranked {} tiles for {}x{} map", points.len(), width, height);

        self.dimensions = Some((width, height));
        self.tiles = points;
    }

    pub fn tiles(&self) -> &[Point] {
        &self.tiles
    }

    /// First `count` tiles of the ranking.
    pub fn prefix(&self, count: usize) -> &[Point] {
        &self.tiles[..count.min(self.tiles.len())]
    }
}
