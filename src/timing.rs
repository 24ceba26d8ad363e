use std::time::{Duration, Instant};

/// Logs the wall-clock time spent in the enclosing scope at trace level.
#[allow(unused_macros)]
macro_rules! scope_timing {
    ($($x:expr),*) => {
        let __data = format!($($x),+);
        let __guard = ::scopeguard::guard(::std::time::Instant::now(), |previous| {
            ::log::trace!("[Timing] {} - {:?}", __data, previous.elapsed());
        });
    };
}

/// Per-tick wall-clock budget, captured once when the tick starts.
///
/// Checked cooperatively at phase boundaries, before each unit is moved and
/// at every node the movement search expands. Once expired it stays expired.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn start(budget: Duration) -> Deadline {
        Deadline {
            start: Instant::now(),
            budget,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.elapsed())
    }

    pub fn expired(&self) -> bool {
        self.remaining() == Duration::ZERO
    }

    /// True when less than `reserve` of the budget is left.
    pub fn below(&self, reserve: Duration) -> bool {
        self.remaining() <= reserve
    }

    /// Remaining share of the budget in `[0, 1]`.
    pub fn remaining_fraction(&self) -> f32 {
        if self.budget.is_zero() {
            return 0.0;
        }

        (self.remaining().as_secs_f32() / self.budget.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Drops the budget to zero; every later checkpoint sees an expired deadline.
    pub fn exhaust(&mut self) {
        self.budget = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_deadline_is_expired() {
        let mut deadline = Deadline::start(Duration::from_secs(60));

        assert!(!deadline.expired());
        assert!(deadline.remaining_fraction() > 0.9);

        deadline.exhaust();

        assert!(deadline.expired());
        assert_eq!(deadline.remaining_fraction(), 0.0);
        assert!(deadline.below(Duration::from_millis(1)));
    }
}
