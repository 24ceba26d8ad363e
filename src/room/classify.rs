use super::data::*;
use crate::config::*;
use crate::location::*;
use log::*;
use std::fmt;

/// Coarse map label that parameterizes the planner thresholds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MapKind {
    Open,
    ObstacleDenseSmall,
    Medium,
    Large,
}

impl MapKind {
    /// Maps big enough that units are steered through quadrant lanes.
    pub fn uses_lanes(self) -> bool {
        matches!(self, MapKind::Medium | MapKind::Large)
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MapKind::Open => "open",
            MapKind::ObstacleDenseSmall => "obstacle_dense_small",
            MapKind::Medium => "medium",
            MapKind::Large => "large",
        };

        f.write_str(name)
    }
}

/// Labels the map once and remembers the answer for the grid dimensions.
#[derive(Default)]
pub struct MapClassifier {
    cached: Option<((i32, i32), MapKind)>,
}

impl MapClassifier {
    pub fn new() -> MapClassifier {
        MapClassifier::default()
    }

    pub fn cached(&self) -> Option<MapKind> {
        self.cached.map(|(_, kind)| kind)
    }

    pub fn classify(&mut self, view: &WorldView, config: &MapConfig) -> MapKind {
        let dimensions = (view.width(), view.height());

        if let Some((cached_dimensions, kind)) = self.cached {
            if cached_dimensions == dimensions {
                return kind;
            }
        }

        let kind = Self::label(view.width(), view.height(), view.neutrals(), config);

        info!("Map {}x{} classified as {}", view.width(), view.height(), kind);

        self.cached = Some((dimensions, kind));

        kind
    }

    /// Pure labelling rule; `classify` adds the caching.
    pub fn label(width: i32, height: i32, neutrals: &[(Point, i32)], config: &MapConfig) -> MapKind {
        let area = width * height;

        if area <= config.small_area {
            let center = Point::new(width / 2, height / 2);

            let central = neutrals
                .iter()
                .filter(|(p, _)| (p.x - center.x).abs() <= config.center_radius && (p.y - center.y).abs() <= config.center_radius)
                .count();

            if central >= config.dense_center_neutrals || neutrals.len() >= config.dense_total_neutrals {
                MapKind::ObstacleDenseSmall
            } else {
                MapKind::Open
            }
        } else if area <= config.medium_area {
            MapKind::Medium
        } else {
            MapKind::Large
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::*;

    fn neutrals(points: &[(i32, i32)]) -> Vec<(Point, i32)> {
        points.iter().map(|(x, y)| (Point::new(*x, *y), 3)).collect()
    }

    #[test]
    fn labels_by_area() {
        let config = MapConfig::default();

        assert_eq!(MapClassifier::label(15, 15, &[], &config), MapKind::Open);
        assert_eq!(MapClassifier::label(30, 30, &[], &config), MapKind::Medium);
        assert_eq!(MapClassifier::label(31, 30, &[], &config), MapKind::Large);
    }

    #[test]
    fn dense_neutrals_mark_small_maps() {
        let config = MapConfig::default();

        let central = neutrals(&[(7, 7), (6, 7), (8, 7), (7, 6), (7, 8)]);
        assert_eq!(MapClassifier::label(15, 15, &central, &config), MapKind::ObstacleDenseSmall);

        let scattered = neutrals(&[(0, 0), (0, 14), (14, 0), (14, 14), (0, 7), (14, 7), (7, 0)]);
        assert_eq!(MapClassifier::label(15, 15, &scattered, &config), MapKind::Open);

        let many = neutrals(&[(0, 0), (0, 14), (14, 0), (14, 14), (0, 7), (14, 7), (7, 0), (7, 14)]);
        assert_eq!(MapClassifier::label(15, 15, &many, &config), MapKind::ObstacleDenseSmall);
    }

    #[test]
    fn classification_is_cached() {
        let config = MapConfig::default();
        let mut classifier = MapClassifier::new();

        let open = Fixture::new(10, 10).build();
        assert_eq!(classifier.classify(&WorldView::new(&open).unwrap(), &config), MapKind::Open);

        let mut crowded = Fixture::new(10, 10);
        for i in 0..9 {
            crowded = crowded.unit(&format!("n{}", i), NEUTRAL_TEAM, i, 0, 2);
        }
        let crowded = crowded.build();

        assert_eq!(classifier.classify(&WorldView::new(&crowded).unwrap(), &config), MapKind::Open);
        assert_eq!(classifier.cached(), Some(MapKind::Open));
    }
}
