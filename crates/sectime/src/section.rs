//! Scoped sections
//!
//! A [`Section`] is a guard: creating it opens a timed scope, dropping it (or
//! calling [`Section::finish`]) closes the scope and prints one line. Exit runs
//! exactly once, including while unwinding from a panic.

use crate::error::TimeitError;
use crate::record::TimingRecord;
use crate::tracker::Tracker;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use tracing::{trace, warn};

/// Decides from the rounded elapsed milliseconds whether a record is printed.
#[derive(Clone, Default)]
pub enum PrintCondition {
    #[default]
    Always,
    When(Rc<dyn Fn(f64) -> bool>),
}

impl PrintCondition {
    pub fn when(predicate: impl Fn(f64) -> bool + 'static) -> Self {
        PrintCondition::When(Rc::new(predicate))
    }

    pub fn allows(&self, elapsed_ms: f64) -> bool {
        match self {
            PrintCondition::Always => true,
            PrintCondition::When(predicate) => predicate(elapsed_ms),
        }
    }
}

impl fmt::Debug for PrintCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintCondition::Always => f.write_str("Always"),
            PrintCondition::When(_) => f.write_str("When(..)"),
        }
    }
}

/// Per-section knobs. The default prints unconditionally with no extra text.
#[derive(Debug, Clone, Default)]
pub struct SectionOptions {
    condition: PrintCondition,
    extra: Option<String>,
}

impl SectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print only when `predicate(elapsed_ms)` holds.
    pub fn print_if(self, predicate: impl Fn(f64) -> bool + 'static) -> Self {
        self.condition(PrintCondition::when(predicate))
    }

    pub fn condition(mut self, condition: PrintCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Text appended to the printed line after `" - "`.
    pub fn extra(mut self, text: impl Into<String>) -> Self {
        self.extra = Some(text.into());
        self
    }
}

/// An open timed scope.
#[must_use = "a section is timed until it is dropped"]
pub struct Section {
    tracker: Tracker,
    name: String,
    options: SectionOptions,
    start: Duration,
    open: bool,
}

impl Section {
    pub(crate) fn enter(tracker: Tracker, name: String, options: SectionOptions) -> Self {
        let start = tracker.enter();
        trace!(section = %name, depth = tracker.depth(), "section entered");
        Self {
            tracker,
            name,
            options,
            start,
            open: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Close the section now, surfacing sink failures that `Drop` can only log.
    pub fn finish(mut self) -> Result<TimingRecord, TimeitError> {
        self.close()
    }

    fn close(&mut self) -> Result<TimingRecord, TimeitError> {
        self.open = false;
        let elapsed = self.tracker.now().saturating_sub(self.start);
        let _leave = Leave(&self.tracker);
        let depth = self.tracker.open_depth();
        let record = TimingRecord::new(
            std::mem::take(&mut self.name),
            elapsed,
            depth,
            self.options.extra.take(),
        );
        trace!(
            section = %record.name(),
            depth,
            elapsed_ms = record.elapsed_ms(),
            "section exited"
        );

        if self.tracker.is_enabled() && self.options.condition.allows(record.elapsed_ms()) {
            self.tracker.emit(&record)?;
        }
        Ok(record)
    }
}

/// Decrements the counter once the record has been decided and written,
/// including when the predicate panics or the sink fails.
struct Leave<'a>(&'a Tracker);

impl Drop for Leave<'_> {
    fn drop(&mut self) {
        self.0.leave();
    }
}

impl Drop for Section {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        if let Err(err) = self.close() {
            warn!(error = ?err, "timing record lost");
        }
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("name", &self.name)
            .field("start", &self.start)
            .field("open", &self.open)
            .finish()
    }
}
