//! Time sources for sections

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// A non-decreasing time source.
///
/// `now` returns the offset from an arbitrary, fixed origin. Only differences
/// between two readings are meaningful.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-independent clock backed by [`Instant`].
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Replays a fixed list of timestamps, one per reading.
///
/// Once the list runs out the last timestamp is returned forever, so an
/// exhausted clock simply stops advancing.
pub struct ScriptedClock {
    ticks: RefCell<VecDeque<Duration>>,
    last: RefCell<Duration>,
}

impl ScriptedClock {
    pub fn new(ticks: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            ticks: RefCell::new(ticks.into_iter().collect()),
            last: RefCell::new(Duration::ZERO),
        }
    }

    pub fn from_micros(ticks: &[u64]) -> Self {
        Self::new(ticks.iter().copied().map(Duration::from_micros))
    }

    pub fn from_millis(ticks: &[u64]) -> Self {
        Self::new(ticks.iter().copied().map(Duration::from_millis))
    }

    /// Readings not consumed yet.
    pub fn remaining(&self) -> usize {
        self.ticks.borrow().len()
    }
}

impl Clock for ScriptedClock {
    fn now(&self) -> Duration {
        let mut last = self.last.borrow_mut();
        if let Some(next) = self.ticks.borrow_mut().pop_front() {
            *last = next;
        }
        *last
    }
}
