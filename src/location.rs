use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

/// A grid cell coordinate. Doubles as the wire `Position` type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }

    /// Manhattan distance; movement is cardinal only.
    pub fn distance_to(&self, other: Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn step(&self, direction: Direction) -> Point {
        let (dx, dy) = direction.offset();

        Point::new(self.x + dx, self.y + dy)
    }

    /// The four cardinal neighbours, in `Direction::ALL` order. Not bounds checked.
    pub fn neighbours(&self) -> impl Iterator<Item = (Direction, Point)> + '_ {
        Direction::ALL.iter().map(move |d| (*d, self.step(*d)))
    }

    pub fn in_bounds(&self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.x < width && self.y >= 0 && self.y < height
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Cardinal movement direction. Serialized as the unit offset the engine expects.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Point", try_from = "Point")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl From<Direction> for Point {
    fn from(direction: Direction) -> Point {
        let (x, y) = direction.offset();

        Point::new(x, y)
    }
}

impl TryFrom<Point> for Direction {
    type Error = String;

    fn try_from(offset: Point) -> Result<Direction, String> {
        match (offset.x, offset.y) {
            (0, -1) => Ok(Direction::Up),
            (0, 1) => Ok(Direction::Down),
            (-1, 0) => Ok(Direction::Left),
            (1, 0) => Ok(Direction::Right),
            _ => Err(format!("Not a cardinal offset: {}", offset)),
        }
    }
}
