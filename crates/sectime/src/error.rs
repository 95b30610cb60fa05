use std::io;
use thiserror::Error;

/// Errors raised by the tracker itself.
///
/// Failures of the timed code are never wrapped in this type; they reach the
/// caller unchanged.
#[derive(Debug, Error)]
pub enum TimeitError {
    #[error("failed to write timing record for section '{section}'")]
    Sink {
        section: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid tracker settings")]
    Settings(#[from] serde_json::Error),
}
