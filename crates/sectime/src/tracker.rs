//! Depth bookkeeping shared by every section of one tracker

use crate::clock::{Clock, MonotonicClock};
use crate::error::TimeitError;
use crate::record::TimingRecord;
use crate::section::{Section, SectionOptions};
use crate::settings::Settings;
use crate::sink::OutputTarget;
use crate::timed::TimedCall;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::io::Write;
use std::rc::Rc;
use std::time::Duration;

/// Depth counter value while no section is open.
const IDLE_DEPTH: i64 = -1;

struct Inner {
    depth: Cell<i64>,
    clock: Box<dyn Clock>,
    sink: RefCell<Box<dyn Write>>,
    enabled: bool,
}

/// Handle to one depth counter, clock and output sink.
///
/// Clones share the same state. A tracker is deliberately `!Send`: its
/// counter is only ever touched by the thread that created it, so nested
/// indentation cannot interleave across threads.
#[derive(Clone)]
pub struct Tracker {
    inner: Rc<Inner>,
}

impl Tracker {
    /// Monotonic clock, printing to stdout.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> TrackerBuilder {
        TrackerBuilder::default()
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::builder()
            .enabled(settings.enabled)
            .target(settings.output)
            .build()
    }

    /// Open a section that always prints.
    pub fn section(&self, name: impl Into<String>) -> Section {
        self.section_with(name, SectionOptions::default())
    }

    pub fn section_with(&self, name: impl Into<String>, options: SectionOptions) -> Section {
        Section::enter(self.clone(), name.into(), options)
    }

    /// Build a wrapper that times every call as a section named `"<name>()"`.
    pub fn timed(&self, name: impl Into<String>, options: SectionOptions) -> TimedCall {
        TimedCall::new(self.clone(), name.into(), options)
    }

    /// Current counter value: `-1` when idle, otherwise the depth of the
    /// innermost open section.
    pub fn depth(&self) -> i64 {
        self.inner.depth.get()
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled
    }

    pub(crate) fn now(&self) -> Duration {
        self.inner.clock.now()
    }

    /// Increment the counter, then read the start time.
    pub(crate) fn enter(&self) -> Duration {
        self.inner.depth.set(self.inner.depth.get() + 1);
        self.now()
    }

    /// Depth of the innermost open section, `0` when idle.
    pub(crate) fn open_depth(&self) -> usize {
        usize::try_from(self.depth()).unwrap_or(0)
    }

    pub(crate) fn leave(&self) {
        self.inner.depth.set(self.inner.depth.get() - 1);
    }

    pub(crate) fn emit(&self, record: &TimingRecord) -> Result<(), TimeitError> {
        let mut sink = self.inner.sink.borrow_mut();
        writeln!(sink, "{record}").map_err(|source| TimeitError::Sink {
            section: record.name().to_string(),
            source,
        })
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("depth", &self.depth())
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

pub struct TrackerBuilder {
    clock: Option<Box<dyn Clock>>,
    sink: Option<Box<dyn Write>>,
    enabled: bool,
}

impl TrackerBuilder {
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn sink(mut self, sink: impl Write + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn target(mut self, target: OutputTarget) -> Self {
        self.sink = Some(target.open());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn build(self) -> Tracker {
        Tracker {
            inner: Rc::new(Inner {
                depth: Cell::new(IDLE_DEPTH),
                clock: self.clock.unwrap_or_else(|| Box::new(MonotonicClock::new())),
                sink: RefCell::new(self.sink.unwrap_or_else(|| OutputTarget::Stdout.open())),
                enabled: self.enabled,
            }),
        }
    }
}

impl Default for TrackerBuilder {
    fn default() -> Self {
        Self {
            clock: None,
            sink: None,
            enabled: true,
        }
    }
}

#[cfg(test)]
pub(crate) fn scripted_tracker(micros: &[u64]) -> (Tracker, crate::sink::MemorySink) {
    let sink = crate::sink::MemorySink::new();
    let tracker = Tracker::builder()
        .clock(crate::clock::ScriptedClock::from_micros(micros))
        .sink(sink.clone())
        .build();
    (tracker, sink)
}
