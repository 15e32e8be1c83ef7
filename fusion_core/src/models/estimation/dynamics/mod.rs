// fusion_core/src/models/estimation/dynamics/mod.rs

use crate::types::{AugmentedVector, StateVector};
use std::fmt::Debug;

/// A trait for process models used within state estimators.
///
/// The model maps one augmented sigma point (state plus process-noise terms)
/// to the state it reaches after `dt` seconds. Noise enters through the
/// augmented components, so the model is applied to every sigma point and no
/// separate process-noise matrix is added afterwards.
pub trait EstimationDynamics: Debug + Send + Sync {
    /// Propagates an augmented point forward by `dt` seconds.
    ///
    /// # Arguments
    /// * `augmented`: `[px, py, v, phi, omega, a, omegadot]`.
    /// * `dt`: Elapsed time in seconds.
    ///
    /// # Returns
    /// The predicted state `[px, py, v, phi, omega]`.
    fn propagate(&self, augmented: &AugmentedVector, dt: f64) -> StateVector;
}

pub mod ctrv;
