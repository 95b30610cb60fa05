//! Timing records and their one-line rendering

use std::fmt;
use std::time::Duration;

const PREFIX: &str = "->>>>>>>>";
const ELAPSED_WIDTH: usize = 14;
const SEPARATOR: &str = "ms      ";
const INDENT: &str = "|   ";

const NANOS_PER_TENTH_MS: u128 = 100_000;

/// Nanoseconds rounded to whole tenths of a millisecond, halves rounding up.
pub fn round_tenths_ms(elapsed: Duration) -> u64 {
    let tenths = (elapsed.as_nanos() + NANOS_PER_TENTH_MS / 2) / NANOS_PER_TENTH_MS;
    u64::try_from(tenths).unwrap_or(u64::MAX)
}

/// The measurement of one finished section.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRecord {
    name: String,
    tenths_ms: u64,
    depth: usize,
    extra: Option<String>,
}

impl TimingRecord {
    pub fn new(name: impl Into<String>, elapsed: Duration, depth: usize, extra: Option<String>) -> Self {
        Self {
            name: name.into(),
            tenths_ms: round_tenths_ms(elapsed),
            depth,
            extra,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Elapsed time in milliseconds, rounded to one decimal place.
    pub fn elapsed_ms(&self) -> f64 {
        self.tenths_ms as f64 / 10.0
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn extra(&self) -> Option<&str> {
        self.extra.as_deref()
    }
}

impl fmt::Display for TimingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elapsed = format!("{}.{}", self.tenths_ms / 10, self.tenths_ms % 10);
        write!(f, "{PREFIX}{elapsed:>ELAPSED_WIDTH$}{SEPARATOR}")?;
        for _ in 0..self.depth {
            f.write_str(INDENT)?;
        }
        f.write_str(&self.name)?;
        if let Some(extra) = &self.extra {
            write!(f, " - {extra}")?;
        }
        Ok(())
    }
}
