// fusion_core/src/models/estimation/measurement/mod.rs

use crate::messages::SensorKind;
use crate::types::StateVector;
use nalgebra::{SMatrix, SVector};
use std::fmt::Debug;

// --- MEASUREMENT MODEL TRAIT ---
// Represents the mathematical model of a sensor. `z = h(x) + v`
pub trait Measurement<const M: usize>: Debug + Send + Sync {
    /// Which sensor this model describes.
    fn kind(&self) -> SensorKind;

    /// Returns the measurement noise covariance matrix `R`.
    fn noise_covariance(&self) -> SMatrix<f64, M, M>;

    /// Predicts the ideal measurement `z_pred = h(x)` from a state (sigma) point.
    fn predict_measurement(&self, state: &StateVector) -> SVector<f64, M>;

    /// Difference `a - b` in measurement space. Models with angular
    /// components override this to wrap them into `(-PI, PI]`.
    fn residual(&self, a: &SVector<f64, M>, b: &SVector<f64, M>) -> SVector<f64, M> {
        a - b
    }
}

pub mod lidar;
pub mod radar;
