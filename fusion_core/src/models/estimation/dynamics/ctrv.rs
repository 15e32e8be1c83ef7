// fusion_core/src/models/estimation/dynamics/ctrv.rs

use crate::models::estimation::dynamics::EstimationDynamics;
use crate::types::{AugmentedVector, StateVector};

/// Below this yaw rate (rad/s) the straight-line closed form is used, which
/// avoids dividing by a near-zero `omega`.
pub const YAW_RATE_EPSILON: f64 = 1.0e-3;

/// Constant turn-rate and velocity (CTRV) motion.
///
/// Speed and yaw rate are constant between observations; the longitudinal
/// acceleration `a` and yaw acceleration `omegadot` carried in the augmented
/// state act as white noise over the interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct CtrvModel;

impl EstimationDynamics for CtrvModel {
    fn propagate(&self, augmented: &AugmentedVector, dt: f64) -> StateVector {
        // --- Extract from the augmented vector ---
        let px = augmented[0];
        let py = augmented[1];
        let v = augmented[2];
        let phi = augmented[3];
        let omega = augmented[4];
        let a = augmented[5];
        let omegadot = augmented[6];

        // --- Deterministic part ---
        let (px_det, py_det, phi_det) = if omega.abs() < YAW_RATE_EPSILON {
            (
                px + v * phi.cos() * dt,
                py + v * phi.sin() * dt,
                phi,
            )
        } else {
            let phi_end = phi + omega * dt;
            (
                px + v / omega * (phi_end.sin() - phi.sin()),
                py + v / omega * (phi.cos() - phi_end.cos()),
                phi_end,
            )
        };

        // --- Noise contribution, identical for both branches ---
        let half_dt_sq = 0.5 * dt * dt;
        StateVector::new(
            px_det + half_dt_sq * phi.cos() * a,
            py_det + half_dt_sq * phi.sin() * a,
            v + dt * a,
            phi_det + half_dt_sq * omegadot,
            omega + dt * omegadot,
        )
    }
}
