// src/config.rs

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::SimResult;

/// Tunable parameters for one simulation run.
///
/// All delay fields are inclusive `(min, max)` ranges in milliseconds.
/// Defaults: ten vehicles arriving 100-500 ms apart, holding each quadrant
/// 500-1000 ms and pausing 200-500 ms between releases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of concurrent vehicle tasks to spawn.
    pub num_vehicles: usize,
    /// Root seed for all randomness; each vehicle derives its own RNG from it.
    pub seed: u64,
    /// Stagger between consecutive vehicle spawns.
    pub arrival_stagger_ms: (u64, u64),
    /// Simulated crossing time per acquired quadrant.
    pub hold_ms: (u64, u64),
    /// Pause between consecutive quadrant releases.
    pub release_pause_ms: (u64, u64),
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_vehicles: 10,
            seed: 0xC0FF_EE00,
            arrival_stagger_ms: (100, 500),
            hold_ms: (500, 1000),
            release_pause_ms: (200, 500),
        }
    }
}

impl SimulationConfig {
    /// Loads a configuration from a JSON file. Missing fields fall back to
    /// their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
