// fusion_sim/src/simulation/core/config.rs

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use fusion_core::config::FilterConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::simulation::error::SimError;

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

/// # SimulationConfig
/// Everything a replay or simulation run needs. This struct is the root of the
/// data parsed from a `fusion.toml` file; any section left out of the file
/// keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub filter: FilterConfig,
    pub scenario: ScenarioConfig,
}

// =========================================================================
// == Configuration Sub-Structs ==
// =========================================================================

/// Which sensor produces the observation at each simulated step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorPattern {
    /// Lidar on even steps, radar on odd ones.
    #[default]
    Alternating,
    LidarOnly,
    RadarOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Seed for the pseudo-random number generator. The same seed always
    /// reproduces the same set of runs.
    pub seed: u64,
    /// Number of independent Monte Carlo runs.
    pub runs: usize,
    /// Observations per run.
    pub steps: usize,
    /// Time between consecutive observations, in microseconds.
    pub sample_period_us: i64,
    pub pattern: SensorPattern,
    /// True initial state `[px, py, v, phi, omega]`.
    pub initial_state: [f64; 5],
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            runs: 10,
            steps: 500,
            sample_period_us: 50_000,
            pattern: SensorPattern::Alternating,
            initial_state: [5.0, 2.0, 3.0, 0.5, 0.1],
        }
    }
}

// =========================================================================
// == Loading ==
// =========================================================================

/// Loads the configuration: built-in defaults, overridden by the TOML file at
/// `path` when one is given.
pub fn load_config(path: Option<&Path>) -> Result<SimulationConfig, SimError> {
    let mut figment = Figment::from(Serialized::defaults(SimulationConfig::default()));

    if let Some(path) = path {
        // Figment silently skips missing files; an explicit path must exist.
        if !path.is_file() {
            return Err(SimError::ConfigNotFound(path.to_path_buf()));
        }
        figment = figment.merge(Toml::file(path));
    }

    let config: SimulationConfig = figment.extract().map_err(Box::new)?;
    config.filter.validate()?;
    Ok(config)
}

/// Same as [`load_config`] but from an in-memory TOML document.
pub fn load_config_str(toml: &str) -> Result<SimulationConfig, SimError> {
    let config: SimulationConfig = Figment::from(Serialized::defaults(SimulationConfig::default()))
        .merge(Toml::string(toml))
        .extract()
        .map_err(Box::new)?;
    config.filter.validate()?;
    Ok(config)
}
