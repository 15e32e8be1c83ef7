// fusion_core/src/estimation/initializer.rs

use nalgebra::{Matrix3, Vector3};

use crate::belief::Belief;
use crate::error::NumericalError;
use crate::estimation::unscented::{linear_residual, SigmaPoints, UkfParams};
use crate::messages::{Observation, ObservationData};
use crate::models::estimation::measurement::Measurement;
use crate::models::estimation::measurement::radar::RadarModel;
use crate::types::{LidarVector, RadarVector, StateCovariance, StateVector};

/// Builds the very first belief from a single raw observation.
///
/// Components a single reading cannot observe (speed, heading and yaw rate for
/// lidar; heading and yaw rate for radar) get `huge_variance`.
#[derive(Debug, Clone)]
pub struct Initializer {
    pub huge_variance: f64,
    /// Lidar noise variances `[std_px^2, std_py^2]`.
    pub lidar_variances: LidarVector,
    pub radar_model: RadarModel,
    /// Spread parameters for the 3-dim transform of a radar reading.
    pub params: UkfParams,
}

impl Initializer {
    /// Fails only if the radar noise covariance cannot be factored.
    pub fn init(&self, observation: &Observation) -> Result<Belief, NumericalError> {
        match &observation.data {
            ObservationData::Lidar(z) => Ok(self.from_lidar(z)),
            ObservationData::Radar(z) => self.from_radar(z),
        }
    }

    fn from_lidar(&self, z: &LidarVector) -> Belief {
        // A fix exactly at the origin is the sensor's cold-start sentinel.
        if z[0] == 0.0 && z[1] == 0.0 {
            return Belief::uninformed(self.huge_variance);
        }

        let mean = StateVector::new(z[0], z[1], 0.0, 0.0, 0.0);
        let covariance = StateCovariance::from_diagonal(&StateVector::new(
            self.lidar_variances[0],
            self.lidar_variances[1],
            self.huge_variance,
            self.huge_variance,
            self.huge_variance,
        ));
        Belief::new(mean, covariance)
    }

    fn from_radar(&self, z: &RadarVector) -> Result<Belief, NumericalError> {
        if z[0] == 0.0 {
            return Ok(Belief::uninformed(self.huge_variance));
        }

        // --- 1. Sigma points of the reading itself (lambda = 3 - 3 = 0 by default) ---
        let sigma = SigmaPoints::generate(z, &self.radar_model.noise_covariance(), &self.params)?;

        // --- 2. Map to Cartesian position and speed ---
        // The sign of the speed is unobservable from one radial velocity.
        let cartesian = sigma.transform(|p| {
            let (range, bearing, range_rate) = (p[0], p[1], p[2]);
            Vector3::new(range * bearing.cos(), range * bearing.sin(), range_rate.abs())
        });

        // --- 3. Recombine; the mean weights serve for both moments here ---
        let cartesian = SigmaPoints {
            weights_c: cartesian.weights_m.clone(),
            ..cartesian
        };
        let mean3 = cartesian.mean();
        let cov3: Matrix3<f64> = cartesian.covariance(&mean3, linear_residual);

        let mut mean = StateVector::zeros();
        mean.fixed_rows_mut::<3>(0).copy_from(&mean3);

        let mut covariance = StateCovariance::zeros();
        covariance.fixed_view_mut::<3, 3>(0, 0).copy_from(&cov3);
        covariance[(3, 3)] = self.huge_variance;
        covariance[(4, 4)] = self.huge_variance;

        Ok(Belief::new(mean, covariance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Cholesky;

    const HUGE: f64 = 1000.0;

    fn initializer() -> Initializer {
        Initializer {
            huge_variance: HUGE,
            lidar_variances: LidarVector::new(0.15 * 0.15, 0.2 * 0.2),
            radar_model: RadarModel::new(0.3, 0.03, 0.3),
            params: UkfParams::default(),
        }
    }

    #[test]
    fn lidar_fix_sets_position_with_sensor_variance() {
        let belief = initializer().init(&Observation::lidar(0, 1.0, 1.0)).unwrap();
        assert_eq!(belief.mean, StateVector::new(1.0, 1.0, 0.0, 0.0, 0.0));
        let expected = StateCovariance::from_diagonal(&StateVector::new(
            0.15 * 0.15,
            0.2 * 0.2,
            HUGE,
            HUGE,
            HUGE,
        ));
        assert_eq!(belief.covariance, expected);
    }

    #[test]
    fn lidar_at_origin_is_uninformed() {
        let belief = initializer().init(&Observation::lidar(0, 0.0, 0.0)).unwrap();
        assert_eq!(belief, Belief::uninformed(HUGE));
    }

    #[test]
    fn radar_with_zero_range_is_uninformed() {
        let belief = initializer().init(&Observation::radar(0, 0.0, 0.7, 3.0)).unwrap();
        assert_eq!(belief.mean, StateVector::zeros());
        assert_eq!(belief.covariance, StateCovariance::identity() * HUGE);
    }

    #[test]
    fn radar_reading_maps_to_cartesian_block() {
        let belief = initializer().init(&Observation::radar(0, 10.0, 0.5, -2.0)).unwrap();

        // The transform is close to linear at this noise level.
        assert_abs_diff_eq!(belief.mean[0], 10.0 * 0.5_f64.cos(), epsilon = 0.05);
        assert_abs_diff_eq!(belief.mean[1], 10.0 * 0.5_f64.sin(), epsilon = 0.05);
        assert!(belief.mean[2] > 1.9 && belief.mean[2] < 2.2);
        assert_eq!(belief.mean[3], 0.0);
        assert_eq!(belief.mean[4], 0.0);

        // Heading and yaw rate are decoupled and unobservable.
        assert_eq!(belief.covariance[(3, 3)], HUGE);
        assert_eq!(belief.covariance[(4, 4)], HUGE);
        for i in 0..5 {
            for j in 3..5 {
                if i != j {
                    assert_eq!(belief.covariance[(i, j)], 0.0);
                    assert_eq!(belief.covariance[(j, i)], 0.0);
                }
            }
        }

        // Range std 0.3 m plus cross-range std 10 * 0.03 = 0.3 m.
        let pos_var = belief.covariance[(0, 0)] + belief.covariance[(1, 1)];
        assert_abs_diff_eq!(pos_var, 0.09 + 0.09, epsilon = 0.02);

        // The joint covariance must stay positive definite.
        assert!(Cholesky::new(belief.covariance).is_some());
    }
}
