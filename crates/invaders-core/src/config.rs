//! Simulation configuration.
//!
//! Every field has a default from [`crate::constants`], so a TOML file only
//! needs to list what it overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// A scheduler interval of zero would spin.
    #[error("Invalid interval: {0} must be greater than zero")]
    InvalidInterval(&'static str),
}

/// Configuration for one formation and its schedulers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Enemy columns in the formation.
    pub column_count: usize,
    /// Enemies per column.
    pub row_count: usize,
    /// Downward translation per nominal motion tick.
    pub speed: f32,
    /// Motion tick cadence in milliseconds.
    pub motion_tick_ms: u64,
    /// Interval between enemy fire attempts in milliseconds.
    pub fire_interval_ms: u64,
    /// Delay before the first enemy fire attempt in milliseconds.
    pub fire_initial_delay_ms: u64,
    /// RNG seed for fire column selection. Same seed = same column sequence.
    pub seed: u64,
    /// Player magazine size.
    pub max_ammo: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            column_count: DEFAULT_COLUMN_COUNT,
            row_count: DEFAULT_ROW_COUNT,
            speed: DEFAULT_SPEED,
            motion_tick_ms: DEFAULT_MOTION_TICK_MS,
            fire_interval_ms: DEFAULT_FIRE_INTERVAL_MS,
            fire_initial_delay_ms: DEFAULT_FIRE_INITIAL_DELAY_MS,
            seed: DEFAULT_SEED,
            max_ammo: DEFAULT_MAX_AMMO,
        }
    }
}

impl SimConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SimConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reject settings that would make a scheduler spin.
    ///
    /// An empty formation is allowed; it just clears the wave immediately.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.motion_tick_ms == 0 {
            return Err(ConfigError::InvalidInterval("motion_tick_ms"));
        }
        if self.fire_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval("fire_interval_ms"));
        }
        if self.column_count == 0 || self.row_count == 0 {
            log::warn!(
                "formation of {}x{} has no enemies; every wave clears immediately",
                self.column_count,
                self.row_count
            );
        }
        Ok(())
    }

    pub fn motion_tick(&self) -> Duration {
        Duration::from_millis(self.motion_tick_ms)
    }

    pub fn fire_interval(&self) -> Duration {
        Duration::from_millis(self.fire_interval_ms)
    }

    pub fn fire_initial_delay(&self) -> Duration {
        Duration::from_millis(self.fire_initial_delay_ms)
    }
}
