// fusion_core/src/estimation/ukf.rs

use nalgebra::SVector;

use crate::belief::Belief;
use crate::config::ProcessNoiseConfig;
use crate::error::NumericalError;
use crate::estimation::unscented::{SigmaPoints, UkfParams};
use crate::models::estimation::dynamics::EstimationDynamics;
use crate::models::estimation::measurement::Measurement;
use crate::types::{StateVariable, StateVector, STATE_DIM};
use crate::utils::angles::normalize_angle;

/// The outcome of a prediction: the predicted belief plus the propagated
/// sigma points the update step reuses.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub belief: Belief,
    pub sigma_points: SigmaPoints<STATE_DIM>,
}

/// The outcome of fusing one observation.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub belief: Belief,
    /// Normalized innovation squared, `y^T S^-1 y`.
    pub nis: f64,
}

/// State-space difference with the heading wrapped into `(-PI, PI]`.
pub fn state_residual(a: &StateVector, b: &StateVector) -> StateVector {
    let mut diff = a - b;
    let heading = StateVariable::Heading.index();
    diff[heading] = normalize_angle(diff[heading]);
    diff
}

/// PURE FUNCTION: Performs one UKF prediction step over the augmented state.
/// Takes a belief and returns the predicted belief. It has no side effects.
pub fn ukf_predict<D: EstimationDynamics + ?Sized>(
    belief: &Belief,
    dt: f64,
    dynamics: &D,
    process_noise: &ProcessNoiseConfig,
    params: &UkfParams,
) -> Result<Prediction, NumericalError> {
    // --- 1. Build the augmented belief ---
    let augmented = belief.augment(process_noise.std_a, process_noise.std_yawdd);

    // --- 2. Generate sigma points (lambda = 3 - 7 = -4 by default) ---
    let augmented_points = SigmaPoints::generate(&augmented.mean, &augmented.covariance, params)?;

    // --- 3. Propagate each point through the NON-LINEAR motion model ---
    let sigma_points = augmented_points.transform(|point| dynamics.propagate(point, dt));

    // --- 4. Recover the predicted mean and covariance ---
    let mean = sigma_points.mean();
    let covariance = sigma_points.covariance(&mean, state_residual);

    Ok(Prediction {
        belief: Belief::new(mean, covariance),
        sigma_points,
    })
}

/// PURE FUNCTION: Performs one UKF measurement update step.
/// Takes the prediction and returns the corrected belief with its NIS.
///
/// The weights are the ones carried by the prediction's 15 sigma points
/// (generated for the 7-dim augmented state), not recomputed for `n = 5`.
pub fn ukf_update<const M: usize, Z: Measurement<M> + ?Sized>(
    model: &Z,
    prediction: &Prediction,
    z: &SVector<f64, M>,
) -> Result<UpdateOutcome, NumericalError> {
    let x_priori = &prediction.belief.mean;
    let p_priori = &prediction.belief.covariance;
    let sigma_x = &prediction.sigma_points;
    let residual = |a: &SVector<f64, M>, b: &SVector<f64, M>| model.residual(a, b);

    // --- 1. Propagate points through the measurement model ---
    let sigma_z = sigma_x.transform(|point| model.predict_measurement(point));

    // --- 2. Predicted measurement and innovation covariance S ---
    let z_pred = sigma_z.mean_with(residual);
    let s = sigma_z.covariance(&z_pred, residual) + model.noise_covariance();

    // --- 3. Cross-covariance between state and measurement space ---
    let t = sigma_x.cross_covariance(x_priori, state_residual, &sigma_z, &z_pred, residual);

    // --- 4. Kalman gain ---
    let s_inv = s
        .try_inverse()
        .ok_or(NumericalError::SingularInnovation {
            sensor: model.kind(),
        })?;
    let k_gain = t * s_inv;

    // --- 5. Innovation and posterior moments ---
    let y = model.residual(z, &z_pred);
    let mut mean = x_priori + k_gain * y;
    let heading = StateVariable::Heading.index();
    mean[heading] = normalize_angle(mean[heading]);
    let covariance = p_priori - k_gain * s * k_gain.transpose();

    let nis = y.dot(&(s_inv * y));

    let belief = Belief::new(mean, covariance).symmetrize();
    if !belief.is_finite() || !nis.is_finite() {
        return Err(NumericalError::NonFiniteEstimate {
            sensor: model.kind(),
        });
    }

    Ok(UpdateOutcome { belief, nis })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::estimation::dynamics::ctrv::CtrvModel;
    use crate::models::estimation::measurement::lidar::LidarModel;
    use crate::models::estimation::measurement::radar::RadarModel;
    use crate::types::{LidarVector, RadarVector, StateCovariance};
    use approx::assert_abs_diff_eq;
    use nalgebra::Cholesky;
    use std::f64::consts::PI;

    fn noise() -> ProcessNoiseConfig {
        ProcessNoiseConfig {
            std_a: 0.5,
            std_yawdd: 0.3,
        }
    }

    fn belief() -> Belief {
        let mut covariance = StateCovariance::from_diagonal(&StateVector::new(0.1, 0.2, 0.5, 0.05, 0.02));
        covariance[(0, 2)] = 0.01;
        covariance[(2, 0)] = 0.01;
        Belief::new(StateVector::new(5.0, 3.0, 4.0, 0.6, 0.1), covariance)
    }

    fn predict(belief: &Belief, dt: f64) -> Prediction {
        ukf_predict(belief, dt, &CtrvModel, &noise(), &UkfParams::default()).unwrap()
    }

    #[test]
    fn prediction_is_deterministic() {
        let first = predict(&belief(), 0.1);
        let second = predict(&belief(), 0.1);
        assert_eq!(first, second);
    }

    #[test]
    fn prediction_produces_fifteen_state_points() {
        let prediction = predict(&belief(), 0.1);
        assert_eq!(prediction.sigma_points.len(), 15);
        assert_abs_diff_eq!(prediction.sigma_points.weights_m.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn prediction_moves_mean_and_grows_uncertainty() {
        let before = belief();
        let prediction = predict(&before, 0.5);
        let after = &prediction.belief;

        // Roughly v * dt along the heading.
        assert!(after.mean[0] > before.mean[0] + 1.0);
        assert!(after.mean[1] > before.mean[1] + 1.0);
        assert!(after.variance(StateVariable::Speed) > before.variance(StateVariable::Speed));
        assert!(after.variance(StateVariable::YawRate) > before.variance(StateVariable::YawRate));
        assert!(Cholesky::new(after.covariance).is_some());
    }

    #[test]
    fn heading_variance_is_bounded_by_wraparound() {
        // Sigma points tens of radians apart in heading: every wrapped residual is
        // at most PI, so the recombined variance cannot exceed sum(wc) * PI^2.
        let mut b = belief();
        b.covariance[(3, 3)] = 1000.0;
        let prediction = predict(&b, 0.1);
        let wc_sum: f64 = prediction.sigma_points.weights_c.iter().sum();
        assert!(prediction.belief.variance(StateVariable::Heading) <= wc_sum * PI * PI);
    }

    #[test]
    fn lidar_update_pulls_toward_observation() {
        let prediction = predict(&belief(), 0.1);
        let model = LidarModel::new(0.15, 0.15);
        let predicted_pos = prediction.belief.mean.fixed_rows::<2>(0).into_owned();
        let z = predicted_pos + LidarVector::new(0.3, -0.2);

        let outcome = ukf_update(&model, &prediction, &z).unwrap();

        let moved = outcome.belief.mean.fixed_rows::<2>(0) - predicted_pos;
        assert!(moved[0] > 0.0 && moved[0] < 0.3);
        assert!(moved[1] < 0.0 && moved[1] > -0.2);
        assert!(outcome.belief.variance(StateVariable::Px) < prediction.belief.variance(StateVariable::Px));
        assert!(outcome.nis > 0.0);
        assert_eq!(outcome.belief.covariance, outcome.belief.covariance.transpose());
    }

    #[test]
    fn observation_equal_to_prediction_gives_zero_nis() {
        let prediction = predict(&belief(), 0.1);
        let model = LidarModel::new(0.15, 0.15);
        let z_pred = prediction.sigma_points.transform(|p| model.predict_measurement(p)).mean();

        let outcome = ukf_update(&model, &prediction, &z_pred).unwrap();

        assert_abs_diff_eq!(outcome.nis, 0.0, epsilon = 1e-20);
        assert_abs_diff_eq!(outcome.belief.mean, prediction.belief.mean, epsilon = 1e-12);
    }

    #[test]
    fn radar_update_handles_bearing_across_pi() {
        // Object behind the sensor on the negative x-axis, just above it.
        let covariance = StateCovariance::from_diagonal(&StateVector::new(0.05, 0.05, 0.5, 0.05, 0.02));
        let b = Belief::new(StateVector::new(-10.0, 0.01, 2.0, PI, 0.0), covariance);
        let prediction = predict(&b, 0.05);
        let model = RadarModel::new(0.3, 0.03, 0.3);

        // Reported just below the axis: bearing close to -PI.
        let z = RadarVector::new(10.1, -PI + 0.002, 2.0);
        let outcome = ukf_update(&model, &prediction, &z).unwrap();

        // A naive difference of ~2 PI in bearing would blow NIS up by orders of magnitude.
        assert!(outcome.nis < 50.0, "nis = {}", outcome.nis);
        assert!((outcome.belief.mean[1] - prediction.belief.mean[1]).abs() < 0.5);
    }

    #[test]
    fn non_finite_observation_is_an_error() {
        let prediction = predict(&belief(), 0.1);
        let model = LidarModel::new(0.15, 0.15);
        let err = ukf_update(&model, &prediction, &LidarVector::new(f64::NAN, 1.0)).unwrap_err();
        assert!(matches!(err, NumericalError::NonFiniteEstimate { .. }));
    }

    #[test]
    fn state_residual_wraps_heading_only() {
        let a = StateVector::new(1.0, 1.0, 1.0, PI - 0.1, 0.0);
        let b = StateVector::new(0.0, 0.0, 0.0, -PI + 0.1, 0.0);
        let diff = state_residual(&a, &b);
        assert_abs_diff_eq!(diff[0], 1.0);
        assert_abs_diff_eq!(diff[3], -0.2, epsilon = 1e-12);
    }
}
