//! Sectime - nested execution-time sections
//!
//! Wrap a block or a function and get one line per finished section, indented
//! by how many sections were open around it:
//!
//! ```text
//! ->>>>>>>>          70.2ms      |   |   decode_rows
//! ->>>>>>>>         500.0ms      |   load_table()
//! ->>>>>>>>        2200.0ms      startup
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use sectime::{timeit, SectionOptions};
//!
//! let _startup = sectime::section("startup");
//!
//! let load = sectime::timed("load_table", SectionOptions::new().print_if(|ms| ms > 5.0))
//!     .wrap(|path: &str| std::fs::read_to_string(path));
//! let table = load("table.csv");
//!
//! let rows = timeit!("decode_rows", { decode(&table) });
//! ```
//!
//! # Threads
//!
//! The free functions use a per-thread default [`Tracker`], so every thread
//! indents independently. A `Tracker` is `!Send` and never shares its depth
//! counter across threads.

mod clock;
mod error;
mod record;
mod section;
mod settings;
mod sink;
mod timed;
mod tracker;

pub use clock::{Clock, MonotonicClock, ScriptedClock};
pub use error::TimeitError;
pub use record::{round_tenths_ms, TimingRecord};
pub use section::{PrintCondition, Section, SectionOptions};
pub use settings::Settings;
pub use sink::{MemorySink, OutputTarget};
pub use timed::{TimedCall, TimedFn, TimedFnMut};
pub use tracker::{Tracker, TrackerBuilder};

use std::cell::RefCell;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

thread_local! {
    static DEFAULT_TRACKER: RefCell<Tracker> = RefCell::new(Tracker::new());
}

/// This thread's default tracker (monotonic clock, stdout unless replaced).
pub fn default_tracker() -> Tracker {
    DEFAULT_TRACKER.with(|tracker| tracker.borrow().clone())
}

/// Replace this thread's default tracker, returning the previous one.
///
/// Sections already open keep reporting to the tracker they were opened on.
pub fn set_default(tracker: Tracker) -> Tracker {
    DEFAULT_TRACKER.with(|current| current.replace(tracker))
}

/// Open a section on this thread's default tracker.
pub fn section(name: impl Into<String>) -> Section {
    default_tracker().section(name)
}

/// Open a section with print condition and extra text on the default tracker.
pub fn section_with(name: impl Into<String>, options: SectionOptions) -> Section {
    default_tracker().section_with(name, options)
}

/// Build a function wrapper timed against the default tracker.
pub fn timed(name: impl Into<String>, options: SectionOptions) -> TimedCall {
    default_tracker().timed(name, options)
}

// ============================================================================
// Macros
// ============================================================================

/// Evaluate a block inside a section of the default tracker
#[macro_export]
macro_rules! timeit {
    ($name:expr, $options:expr, $body:block) => {{
        let _section = $crate::section_with($name, $options);
        $body
    }};
    ($name:expr, $body:block) => {{
        let _section = $crate::section($name);
        $body
    }};
}
