// fusion_core/src/models/estimation/measurement/lidar.rs

use crate::messages::SensorKind;
use crate::models::estimation::measurement::Measurement;
use crate::types::{LidarVector, StateVector, LIDAR_DIM};
use nalgebra::SMatrix;

/// Direct planar position sensor: `h(x) = [px, py]`.
#[derive(Debug, Clone)]
pub struct LidarModel {
    /// The 2x2 measurement noise covariance matrix, R.
    pub r_matrix: SMatrix<f64, LIDAR_DIM, LIDAR_DIM>,
}

impl LidarModel {
    pub fn new(std_px: f64, std_py: f64) -> Self {
        Self {
            r_matrix: SMatrix::from_diagonal(&LidarVector::new(std_px * std_px, std_py * std_py)),
        }
    }
}

impl Measurement<LIDAR_DIM> for LidarModel {
    fn kind(&self) -> SensorKind {
        SensorKind::Lidar
    }

    fn noise_covariance(&self) -> SMatrix<f64, LIDAR_DIM, LIDAR_DIM> {
        self.r_matrix
    }

    fn predict_measurement(&self, state: &StateVector) -> LidarVector {
        state.fixed_rows::<LIDAR_DIM>(0).into_owned()
    }
}
