//! Engine configuration with documented constants
//!
//! The rule-book values (osaekomi hold thresholds, the shido limit) are fixed
//! constants in the scoring modules; only the knobs an organizer may
//! legitimately vary live here.

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::core::types::Seconds;

/// Regulation match duration in seconds (IJF senior rules: 4 minutes)
pub const DEFAULT_MATCH_DURATION_SECS: Seconds = 240;

/// Configuration for the match engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Countdown the clock is armed with when a match starts (seconds)
    ///
    /// 240 is regulation time for senior competition. Veteran and kata
    /// events run shorter matches, so organizers can lower this.
    pub match_duration_secs: Seconds,

    /// Whether the engine spawns a 1 Hz clock driver task per active match
    ///
    /// The driver is the only caller of the tick operation in production.
    /// Tests disable it and drive ticks directly so clock expiry is
    /// deterministic.
    pub drive_clock: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            match_duration_secs: DEFAULT_MATCH_DURATION_SECS,
            drive_clock: true,
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML text, falling back to defaults for
    /// missing fields
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Load a config from a TOML file
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
