//! Engine configuration with documented constants
//!
//! Collects the tunable values for the demo driver and for embedding the
//! engine, with explanations of their purpose.

use std::path::Path;

use serde::Deserialize;

use crate::core::error::ForgeError;

/// Configuration for the cellular engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grid width in cells
    ///
    /// The grid store itself is sparse; width/height exist for the external
    /// renderer and for bounds-aware tooling, not for allocation.
    pub grid_width: i32,

    /// Grid height in cells
    pub grid_height: i32,

    /// Milliseconds between scheduler-driven ticks
    ///
    /// The engine itself is tick-driven and timing-agnostic; this value is
    /// what an external scheduler (the demo driver) uses between ticks.
    pub tick_interval_ms: u64,

    /// Seed for the shared rule RNG
    ///
    /// `None` seeds from OS entropy. Deterministic runs (tests, replays)
    /// must set this explicitly.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 30,
            tick_interval_ms: 100,
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ForgeError> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width <= 0 || self.grid_height <= 0 {
            return Err(format!(
                "grid dimensions must be positive, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be positive".into());
        }

        Ok(())
    }
}
