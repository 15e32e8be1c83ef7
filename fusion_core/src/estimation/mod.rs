// fusion_core/src/estimation/mod.rs

use crate::belief::Belief;
use crate::error::NumericalError;
use crate::messages::{Observation, SensorKind};
use crate::types::Timestamp;

/// The contract for any algorithm that performs the "State Estimator" role.
/// Its sole responsibility is to estimate the state of a single object.
pub trait StateEstimator: Send + Sync {
    /// The single, unified method for processing an observation.
    ///
    /// The first call initializes the belief; every later call predicts to the
    /// observation's timestamp and then fuses it. On error the belief is left
    /// exactly as it was before the call.
    fn process(&mut self, observation: &Observation) -> Result<(), NumericalError>;

    /// Returns the current best estimate, or `None` before the first observation.
    fn belief(&self) -> Option<&Belief>;

    /// Timestamp of the last observation that was successfully processed.
    fn last_timestamp(&self) -> Option<Timestamp>;

    /// Most recent normalized innovation squared for a sensor, `NaN` until
    /// that sensor has produced an update.
    fn nis(&self, sensor: SensorKind) -> f64;
}

pub mod filters;
pub mod initializer;
pub mod ukf;
pub mod unscented;
