// fusion_sim/src/prelude.rs

// Re-export the entire fusion_core prelude so binaries and tests can reach
// the filter, its config and the observation types from one place.
pub use fusion_core::prelude::*;

// Re-export common simulation-specific types.
pub use crate::cli::{Cli, Command};
pub use crate::simulation::core::config::{
    load_config, load_config_str, ScenarioConfig, SensorPattern, SimulationConfig,
};
pub use crate::simulation::core::prng::SimulationRng;
pub use crate::simulation::dataset::{DatasetRecord, GroundTruth};
pub use crate::simulation::error::{DatasetError, SimError};
pub use crate::simulation::metrics::{chi_square_95, NisStats, RmseAccumulator};
pub use crate::simulation::runner::{run, Evaluation};
pub use crate::{execute, replay, simulate};
