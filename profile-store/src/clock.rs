//! Timestamp source for new record ids

use std::cell::Cell;

/// Source of "now" in milliseconds since the Unix epoch
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Deterministic clock for tests and replays
///
/// Returns `start`, then advances by `step` on every reading.
#[derive(Debug, Clone)]
pub struct ManualClock {
    next: Cell<i64>,
    step: i64,
}

impl ManualClock {
    /// A clock that always reads `at`
    pub fn fixed(at: i64) -> Self {
        Self::stepping(at, 0)
    }

    /// A clock starting at `start` and advancing by `step` per reading
    pub fn stepping(start: i64, step: i64) -> Self {
        Self {
            next: Cell::new(start),
            step,
        }
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        let now = self.next.get();
        self.next.set(now + self.step);
        now
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}
