//! Monotonic time source for per-test timing.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// A monotonic timestamp source. Readings are offsets from an arbitrary
/// fixed origin; only differences are meaningful. Must be steady under
/// system clock adjustments.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// The default clock: `std::time::Instant` anchored at construction.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        MonotonicClock::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Deterministic clock for tests: every reading advances the current time
/// by a fixed step, so a body timed with two readings appears to take
/// exactly one step.
#[derive(Debug)]
pub struct ManualClock {
    current: Cell<Duration>,
    step: Duration,
}

impl ManualClock {
    #[must_use]
    pub fn new(step: Duration) -> Self {
        ManualClock {
            current: Cell::new(Duration::ZERO),
            step,
        }
    }

    pub fn set(&self, at: Duration) {
        self.current.set(at);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        let reading = self.current.get();
        self.current.set(reading + self.step);
        reading
    }
}
