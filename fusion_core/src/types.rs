// fusion_core/src/types.rs

use nalgebra::{SMatrix, SVector};

// --- Core Dimensions ---
/// Dimension of the CTRV state `[px, py, v, phi, omega]`.
pub const STATE_DIM: usize = 5;
/// State plus the two process-noise terms `[a, omegadot]`.
pub const AUGMENTED_DIM: usize = 7;
pub const LIDAR_DIM: usize = 2;
pub const RADAR_DIM: usize = 3;

// --- Core Type Aliases ---
pub type StateVector = SVector<f64, STATE_DIM>;
pub type StateCovariance = SMatrix<f64, STATE_DIM, STATE_DIM>;
pub type AugmentedVector = SVector<f64, AUGMENTED_DIM>;
pub type AugmentedCovariance = SMatrix<f64, AUGMENTED_DIM, AUGMENTED_DIM>;
pub type LidarVector = SVector<f64, LIDAR_DIM>;
pub type RadarVector = SVector<f64, RADAR_DIM>;

/// Observation timestamps are integer microseconds.
pub type Timestamp = i64;

const MICROS_PER_SECOND: f64 = 1.0e6;

/// Elapsed time in seconds between two microsecond timestamps.
pub fn elapsed_seconds(from: Timestamp, to: Timestamp) -> f64 {
    // Widen first: the difference of two arbitrary i64 values can overflow.
    (i128::from(to) - i128::from(from)) as f64 / MICROS_PER_SECOND
}

/// Names the five components of the CTRV state vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateVariable {
    Px,
    Py,
    /// Speed magnitude along the heading.
    Speed,
    /// Heading angle, radians.
    Heading,
    /// Yaw rate, radians per second.
    YawRate,
}

impl StateVariable {
    pub const ALL: [StateVariable; STATE_DIM] = [
        StateVariable::Px,
        StateVariable::Py,
        StateVariable::Speed,
        StateVariable::Heading,
        StateVariable::YawRate,
    ];

    /// Position of this variable in the state vector.
    pub const fn index(self) -> usize {
        match self {
            StateVariable::Px => 0,
            StateVariable::Py => 1,
            StateVariable::Speed => 2,
            StateVariable::Heading => 3,
            StateVariable::YawRate => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_seconds_converts_microseconds() {
        assert_eq!(elapsed_seconds(1_000_000, 1_100_000), 0.1);
        assert_eq!(elapsed_seconds(5, 5), 0.0);
        assert_eq!(elapsed_seconds(1_100_000, 1_000_000), -0.1);
    }

    #[test]
    fn elapsed_seconds_survives_extreme_timestamps() {
        let span = elapsed_seconds(i64::MIN, i64::MAX);
        assert!(span.is_finite() && span > 0.0);
        assert_eq!(span, (u64::MAX as f64) / 1.0e6);
        assert!(elapsed_seconds(i64::MAX, i64::MIN) < 0.0);
    }

    #[test]
    fn state_variable_indices_follow_layout_order() {
        for (i, var) in StateVariable::ALL.iter().enumerate() {
            assert_eq!(var.index(), i);
        }
    }
}
