// fusion_core/src/belief.rs

use crate::types::{
    AugmentedCovariance, AugmentedVector, StateCovariance, StateVariable, StateVector, STATE_DIM,
};

/// The filter's estimate of the object state: a mean vector and its covariance.
///
/// Prediction and update each produce a fresh `Belief` rather than editing
/// one in place. The filter only swaps in the new value once a step has fully
/// succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct Belief {
    /// `[px, py, v, phi, omega]`.
    pub mean: StateVector,
    /// 5x5 symmetric positive-semidefinite covariance.
    pub covariance: StateCovariance,
}

impl Belief {
    pub fn new(mean: StateVector, covariance: StateCovariance) -> Self {
        Self { mean, covariance }
    }

    /// Zero mean with a scaled identity covariance, used whenever the first
    /// observation carries no usable information.
    pub fn uninformed(variance: f64) -> Self {
        Self {
            mean: StateVector::zeros(),
            covariance: StateCovariance::identity() * variance,
        }
    }

    pub fn get(&self, var: StateVariable) -> f64 {
        self.mean[var.index()]
    }

    pub fn variance(&self, var: StateVariable) -> f64 {
        self.covariance[(var.index(), var.index())]
    }

    /// Cartesian velocity `[vx, vy]` implied by speed and heading.
    pub fn velocity(&self) -> (f64, f64) {
        let v = self.get(StateVariable::Speed);
        let phi = self.get(StateVariable::Heading);
        (v * phi.cos(), v * phi.sin())
    }

    /// Pads the belief with the two zero-mean process-noise terms.
    ///
    /// The covariance keeps the belief covariance in its top-left block and
    /// `diag(std_a^2, std_yawdd^2)` in the bottom-right block.
    pub fn augment(&self, std_a: f64, std_yawdd: f64) -> AugmentedBelief {
        let mut mean = AugmentedVector::zeros();
        mean.fixed_rows_mut::<STATE_DIM>(0).copy_from(&self.mean);

        let mut covariance = AugmentedCovariance::zeros();
        covariance
            .fixed_view_mut::<STATE_DIM, STATE_DIM>(0, 0)
            .copy_from(&self.covariance);
        covariance[(STATE_DIM, STATE_DIM)] = std_a * std_a;
        covariance[(STATE_DIM + 1, STATE_DIM + 1)] = std_yawdd * std_yawdd;

        AugmentedBelief { mean, covariance }
    }

    pub fn is_finite(&self) -> bool {
        self.mean.iter().chain(self.covariance.iter()).all(|v| v.is_finite())
    }

    /// Forces exact symmetry; tiny numerical errors accumulate otherwise.
    pub(crate) fn symmetrize(mut self) -> Self {
        self.covariance = (self.covariance + self.covariance.transpose()) * 0.5;
        self
    }
}

/// Belief extended with the process-noise parameters. Lives for one
/// prediction step only.
#[derive(Debug, Clone)]
pub struct AugmentedBelief {
    pub mean: AugmentedVector,
    pub covariance: AugmentedCovariance,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn augment_block_combines_state_and_noise_covariance() {
        let mean = StateVector::new(1.0, 2.0, 3.0, 0.4, 0.05);
        let mut covariance = StateCovariance::identity() * 2.0;
        covariance[(0, 1)] = 0.3;
        covariance[(1, 0)] = 0.3;
        let belief = Belief::new(mean, covariance);

        let aug = belief.augment(0.5, 0.2);

        assert_eq!(aug.mean.fixed_rows::<STATE_DIM>(0).into_owned(), mean);
        assert_eq!(aug.mean[5], 0.0);
        assert_eq!(aug.mean[6], 0.0);
        assert_eq!(
            aug.covariance.fixed_view::<STATE_DIM, STATE_DIM>(0, 0).into_owned(),
            covariance
        );
        assert_abs_diff_eq!(aug.covariance[(5, 5)], 0.25);
        assert_abs_diff_eq!(aug.covariance[(6, 6)], 0.04, epsilon = 1e-15);
        // Cross blocks stay zero.
        for i in 0..STATE_DIM {
            assert_eq!(aug.covariance[(i, 5)], 0.0);
            assert_eq!(aug.covariance[(6, i)], 0.0);
        }
    }

    #[test]
    fn velocity_projects_speed_onto_heading() {
        let belief = Belief::new(
            StateVector::new(0.0, 0.0, 2.0, std::f64::consts::FRAC_PI_2, 0.0),
            StateCovariance::identity(),
        );
        let (vx, vy) = belief.velocity();
        assert_abs_diff_eq!(vx, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(vy, 2.0, epsilon = 1e-12);
    }
}
