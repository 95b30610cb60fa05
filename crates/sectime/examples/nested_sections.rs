//! Prints a small tree of nested timings to stdout.
//!
//! Logging goes through `tracing`; timing lines go to the configured sink.

use anyhow::Result;
use sectime::{timeit, SectionOptions, Settings, Tracker};
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("sectime v{}", sectime::VERSION);

    let settings = Settings::from_json(r#"{ "enabled": true, "output": "stdout" }"#)?;
    sectime::set_default(Tracker::from_settings(&settings));

    let startup = sectime::section("startup");

    let load = sectime::timed("load_chunk", SectionOptions::new().print_if(|ms| ms > 2.0))
        .wrap(|millis: u64| {
            thread::sleep(Duration::from_millis(millis));
            millis
        });
    let loaded: u64 = [1, 3, 5].into_iter().map(&load).sum();

    timeit!("decode", SectionOptions::new().extra(format!("{loaded} units")), {
        thread::sleep(Duration::from_millis(4));
    });

    let record = startup.finish()?;
    tracing::info!(elapsed_ms = record.elapsed_ms(), "startup finished");

    Ok(())
}
