// fusion_core/src/models/estimation/measurement/radar.rs

use crate::messages::SensorKind;
use crate::models::estimation::measurement::Measurement;
use crate::types::{RadarVector, StateVector, RADAR_DIM};
use crate::utils::angles::normalize_angle;
use nalgebra::SMatrix;

/// Smallest range used as the range-rate denominator. Near the sensor origin
/// the range rate is undefined; clamping trades a bounded error for never
/// producing a NaN.
pub const MIN_RANGE: f64 = 1.0e-4;

/// A polar sensor reporting `[range, bearing, range_rate]`.
///
/// The bearing is measured from the x-axis, so
/// `h(x) = [sqrt(px^2 + py^2), atan2(py, px), (px*v*cos(phi) + py*v*sin(phi)) / range]`.
#[derive(Debug, Clone)]
pub struct RadarModel {
    /// The 3x3 measurement noise covariance matrix, R.
    pub r_matrix: SMatrix<f64, RADAR_DIM, RADAR_DIM>,
}

impl RadarModel {
    pub fn new(std_range: f64, std_bearing: f64, std_range_rate: f64) -> Self {
        Self {
            r_matrix: SMatrix::from_diagonal(&RadarVector::new(
                std_range * std_range,
                std_bearing * std_bearing,
                std_range_rate * std_range_rate,
            )),
        }
    }
}

impl Measurement<RADAR_DIM> for RadarModel {
    fn kind(&self) -> SensorKind {
        SensorKind::Radar
    }

    fn noise_covariance(&self) -> SMatrix<f64, RADAR_DIM, RADAR_DIM> {
        self.r_matrix
    }

    fn predict_measurement(&self, state: &StateVector) -> RadarVector {
        let px = state[0];
        let py = state[1];
        let v = state[2];
        let phi = state[3];

        let range = px.hypot(py);
        let bearing = py.atan2(px);
        let range_rate = (px * v * phi.cos() + py * v * phi.sin()) / range.max(MIN_RANGE);

        RadarVector::new(range, bearing, range_rate)
    }

    fn residual(&self, a: &RadarVector, b: &RadarVector) -> RadarVector {
        let mut diff = a - b;
        diff[1] = normalize_angle(diff[1]);
        diff
    }
}
