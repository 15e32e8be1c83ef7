// fusion_sim/src/simulation/metrics.rs

use fusion_core::belief::Belief;
use fusion_core::messages::SensorKind;
use nalgebra::Vector4;

use crate::simulation::dataset::GroundTruth;

/// 95th percentile of the chi-square distribution for the measurement
/// dimension of each sensor (2 degrees of freedom for lidar, 3 for radar).
pub fn chi_square_95(sensor: SensorKind) -> f64 {
    match sensor {
        SensorKind::Lidar => 5.991,
        SensorKind::Radar => 7.815,
    }
}

// =========================================================================
// == RMSE ==
// =========================================================================

/// Running root-mean-square error over `[px, py, vx, vy]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RmseAccumulator {
    sum_sq: Vector4<f64>,
    count: usize,
}

impl RmseAccumulator {
    pub fn push(&mut self, estimate: &Belief, truth: &GroundTruth) {
        let (vx, vy) = estimate.velocity();
        let error = Vector4::new(
            estimate.mean[0] - truth.px,
            estimate.mean[1] - truth.py,
            vx - truth.vx,
            vy - truth.vy,
        );
        self.sum_sq += error.component_mul(&error);
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// `None` until at least one sample has been pushed.
    pub fn rmse(&self) -> Option<Vector4<f64>> {
        if self.count == 0 {
            return None;
        }
        Some((self.sum_sq / self.count as f64).map(f64::sqrt))
    }

    pub fn merge(&mut self, other: &Self) {
        self.sum_sq += other.sum_sq;
        self.count += other.count;
    }
}

// =========================================================================
// == NIS ==
// =========================================================================

/// Summary of the NIS values one sensor produced.
#[derive(Debug, Clone, PartialEq)]
pub struct NisStats {
    sensor: SensorKind,
    count: usize,
    sum: f64,
    above_bound: usize,
}

impl NisStats {
    pub fn new(sensor: SensorKind) -> Self {
        Self {
            sensor,
            count: 0,
            sum: 0.0,
            above_bound: 0,
        }
    }

    pub fn push(&mut self, nis: f64) {
        self.count += 1;
        self.sum += nis;
        if nis > chi_square_95(self.sensor) {
            self.above_bound += 1;
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Share of values above the 95% bound; about 0.05 for a consistent filter.
    pub fn fraction_above_bound(&self) -> Option<f64> {
        (self.count > 0).then(|| self.above_bound as f64 / self.count as f64)
    }

    pub fn merge(&mut self, other: &Self) {
        debug_assert_eq!(self.sensor, other.sensor);
        self.count += other.count;
        self.sum += other.sum;
        self.above_bound += other.above_bound;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use fusion_core::types::{StateCovariance, StateVector};
    use std::f64::consts::FRAC_PI_2;

    fn belief(px: f64, py: f64, v: f64, phi: f64) -> Belief {
        Belief::new(StateVector::new(px, py, v, phi, 0.0), StateCovariance::identity())
    }

    #[test]
    fn rmse_is_none_when_empty() {
        assert!(RmseAccumulator::default().rmse().is_none());
    }

    #[test]
    fn rmse_uses_cartesian_velocity() {
        let mut acc = RmseAccumulator::default();
        let truth = GroundTruth {
            px: 1.0,
            py: 2.0,
            vx: 0.0,
            vy: 1.0,
        };
        // Heading 90 degrees with speed 1 is exactly the true velocity.
        acc.push(&belief(1.0, 2.0, 1.0, FRAC_PI_2), &truth);
        acc.push(&belief(4.0, 2.0, 1.0, FRAC_PI_2), &truth);

        let rmse = acc.rmse().unwrap();
        assert_abs_diff_eq!(rmse[0], (9.0_f64 / 2.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(rmse[1], 0.0);
        assert_abs_diff_eq!(rmse[2], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rmse[3], 0.0, epsilon = 1e-12);
        assert_eq!(acc.count(), 2);
    }

    #[test]
    fn merged_rmse_matches_single_accumulator() {
        let truth = GroundTruth {
            px: 0.0,
            py: 0.0,
            vx: 1.0,
            vy: 0.0,
        };
        let estimates = [belief(0.1, 0.0, 1.0, 0.0), belief(0.0, -0.3, 1.2, 0.0), belief(0.2, 0.2, 0.9, 0.1)];

        let mut all = RmseAccumulator::default();
        let mut first = RmseAccumulator::default();
        let mut second = RmseAccumulator::default();
        for (i, estimate) in estimates.iter().enumerate() {
            all.push(estimate, &truth);
            if i == 0 {
                first.push(estimate, &truth);
            } else {
                second.push(estimate, &truth);
            }
        }
        first.merge(&second);
        assert_eq!(first.count(), all.count());
        assert_abs_diff_eq!(first.rmse().unwrap(), all.rmse().unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn nis_stats_count_values_above_bound() {
        let mut stats = NisStats::new(SensorKind::Lidar);
        assert!(stats.mean().is_none());
        for nis in [1.0, 2.0, 3.0, 6.0] {
            stats.push(nis);
        }
        assert_abs_diff_eq!(stats.mean().unwrap(), 3.0);
        assert_abs_diff_eq!(stats.fraction_above_bound().unwrap(), 0.25);

        // 6.0 is inside the radar bound.
        let mut radar = NisStats::new(SensorKind::Radar);
        radar.push(6.0);
        assert_abs_diff_eq!(radar.fraction_above_bound().unwrap(), 0.0);
    }
}
