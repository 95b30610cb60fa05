//! Tracker settings

use crate::error::TimeitError;
use crate::sink::OutputTarget;
use serde::{Deserialize, Serialize};

/// Tracker configuration. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// When false, sections still track depth but never print.
    pub enabled: bool,
    pub output: OutputTarget,
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self, TimeitError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            output: OutputTarget::Stdout,
        }
    }
}
