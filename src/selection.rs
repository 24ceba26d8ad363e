/// Outcome of one selection strategy. Strategies are tried in order and the
/// first `Found` wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection<T> {
    Found(T),
    NotFound,
}

impl<T> Selection<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Selection::Found(_))
    }

    /// Falls through to the next strategy when nothing was found.
    pub fn or_else<F>(self, next: F) -> Selection<T>
    where
        F: FnOnce() -> Selection<T>,
    {
        match self {
            Selection::Found(value) => Selection::Found(value),
            Selection::NotFound => next(),
        }
    }

    pub fn map<U, F>(self, f: F) -> Selection<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Selection::Found(value) => Selection::Found(f(value)),
            Selection::NotFound => Selection::NotFound,
        }
    }

    pub fn found(self) -> Option<T> {
        match self {
            Selection::Found(value) => Some(value),
            Selection::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Selection<T> {
        match value {
            Some(value) => Selection::Found(value),
            None => Selection::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_found_strategy_wins() {
        let mut tried = Vec::new();

        let result = Selection::<i32>::NotFound
            .or_else(|| {
                tried.push(1);
                Selection::Found(7)
            })
            .or_else(|| Selection::Found(9));

        assert_eq!(result, Selection::Found(7));
        assert_eq!(tried, vec![1]);
        assert_eq!(Selection::from(None::<i32>).map(|v| v + 1), Selection::NotFound);
    }
}
