use crate::location::*;
use crate::message::*;

pub trait HasPosition {
    fn pos(&self) -> Point;
}

impl HasPosition for Point {
    fn pos(&self) -> Point {
        *self
    }
}

impl HasPosition for Spore {
    fn pos(&self) -> Point {
        self.position
    }
}

impl HasPosition for Spawner {
    fn pos(&self) -> Point {
        self.position
    }
}

impl<T: HasPosition> HasPosition for &T {
    fn pos(&self) -> Point {
        T::pos(*self)
    }
}

pub trait FindNearest<T: Sized + HasPosition> {
    /// Nearest item by Manhattan distance; the first encountered wins ties.
    fn find_nearest_linear(self, start_pos: Point) -> Option<T>
    where
        Self: Sized;

    /// As `find_nearest_linear`, limited to items at most `range` away.
    fn find_nearest_in_range(self, start_pos: Point, range: i32) -> Option<(T, i32)>
    where
        Self: Sized;
}

impl<I> FindNearest<I::Item> for I
where
    I: Iterator,
    I::Item: HasPosition,
{
    fn find_nearest_linear(self, start_pos: Point) -> Option<I::Item> {
        self.map(|pos_object| (start_pos.distance_to(pos_object.pos()), pos_object))
            .min_by_key(|(length, _)| *length)
            .map(|(_, pos_object)| pos_object)
    }

    fn find_nearest_in_range(self, start_pos: Point, range: i32) -> Option<(I::Item, i32)> {
        self.map(|pos_object| (start_pos.distance_to(pos_object.pos()), pos_object))
            .filter(|(length, _)| *length <= range)
            .min_by_key(|(length, _)| *length)
            .map(|(length, pos_object)| (pos_object, length))
    }
}
