// fusion_sim/src/simulation/runner.rs

use fusion_core::estimation::StateEstimator;
use fusion_core::messages::SensorKind;
use tracing::{debug, info, warn};

use crate::simulation::dataset::DatasetRecord;
use crate::simulation::metrics::{NisStats, RmseAccumulator};

/// Everything measured while feeding one or more record streams to a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Observations the estimator accepted.
    pub processed: usize,
    /// Observations rejected with a numerical error.
    pub failures: usize,
    pub rmse: RmseAccumulator,
    pub nis_lidar: NisStats,
    pub nis_radar: NisStats,
}

impl Default for Evaluation {
    fn default() -> Self {
        Self {
            processed: 0,
            failures: 0,
            rmse: RmseAccumulator::default(),
            nis_lidar: NisStats::new(SensorKind::Lidar),
            nis_radar: NisStats::new(SensorKind::Radar),
        }
    }
}

impl Evaluation {
    pub fn nis(&self, sensor: SensorKind) -> &NisStats {
        match sensor {
            SensorKind::Lidar => &self.nis_lidar,
            SensorKind::Radar => &self.nis_radar,
        }
    }

    fn nis_mut(&mut self, sensor: SensorKind) -> &mut NisStats {
        match sensor {
            SensorKind::Lidar => &mut self.nis_lidar,
            SensorKind::Radar => &mut self.nis_radar,
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.processed += other.processed;
        self.failures += other.failures;
        self.rmse.merge(&other.rmse);
        self.nis_lidar.merge(&other.nis_lidar);
        self.nis_radar.merge(&other.nis_radar);
    }

    /// Reports the evaluation at `info` level under `label`.
    pub fn log_summary(&self, label: &str) {
        info!(
            label,
            processed = self.processed,
            failures = self.failures,
            "run finished"
        );
        match self.rmse.rmse() {
            Some(rmse) => info!(
                label,
                px = rmse[0],
                py = rmse[1],
                vx = rmse[2],
                vy = rmse[3],
                "RMSE"
            ),
            None => info!(label, "no ground truth available; RMSE skipped"),
        }
        for sensor in [SensorKind::Lidar, SensorKind::Radar] {
            let stats = self.nis(sensor);
            if let (Some(mean), Some(above)) = (stats.mean(), stats.fraction_above_bound()) {
                info!(
                    label,
                    %sensor,
                    updates = stats.count(),
                    mean,
                    above_95 = above,
                    "NIS"
                );
            }
        }
    }
}

/// Feeds `records` to `estimator` in order and evaluates the result.
///
/// A record the estimator rejects is logged and skipped; processing continues
/// with the next one.
pub fn run<E: StateEstimator + ?Sized>(estimator: &mut E, records: &[DatasetRecord]) -> Evaluation {
    let mut evaluation = Evaluation::default();

    for record in records {
        let observation = &record.observation;
        let sensor = observation.sensor_kind();
        // Initialization produces no NIS. A disabled sensor never produces one.
        let was_initialized = estimator.belief().is_some();

        if let Err(err) = estimator.process(observation) {
            warn!(timestamp = observation.timestamp, %sensor, %err, "observation rejected");
            evaluation.failures += 1;
            continue;
        }
        evaluation.processed += 1;

        let nis = estimator.nis(sensor);
        if was_initialized && nis.is_finite() {
            evaluation.nis_mut(sensor).push(nis);
        }

        let Some(belief) = estimator.belief() else {
            continue;
        };
        debug!(
            timestamp = observation.timestamp,
            px = belief.mean[0],
            py = belief.mean[1],
            v = belief.mean[2],
            yaw = belief.mean[3],
            yaw_rate = belief.mean[4],
            "estimate"
        );
        if let Some(truth) = &record.ground_truth {
            evaluation.rmse.push(belief, truth);
        }
    }

    evaluation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::dataset::parse_str;
    use fusion_core::config::FilterConfig;
    use fusion_core::estimation::filters::UnscentedKalmanFilter;

    fn filter() -> UnscentedKalmanFilter {
        let mut config = FilterConfig::default();
        config.lidar.std_px = 0.15;
        config.lidar.std_py = 0.15;
        UnscentedKalmanFilter::new(config).unwrap()
    }

    #[test]
    fn counts_updates_but_not_initialization() {
        let records = parse_str(
            "L 1.0 1.0 0 1.0 1.0 2.0 0.0\n\
             L 1.1 1.0 50000 1.1 1.0 2.0 0.0\n\
             L 1.2 1.0 100000 1.2 1.0 2.0 0.0\n",
        )
        .unwrap();
        let mut ukf = filter();

        let evaluation = run(&mut ukf, &records);

        assert_eq!(evaluation.processed, 3);
        assert_eq!(evaluation.failures, 0);
        assert_eq!(evaluation.nis_lidar.count(), 2);
        assert_eq!(evaluation.nis_radar.count(), 0);
        assert_eq!(evaluation.rmse.count(), 3);
    }

    #[test]
    fn rejected_observations_are_skipped() {
        let records = parse_str("L 1.0 1.0 0\nL NaN 1.0 50000\nL 1.2 1.0 100000\n").unwrap();
        let mut ukf = filter();

        let evaluation = run(&mut ukf, &records);

        assert_eq!(evaluation.processed, 2);
        assert_eq!(evaluation.failures, 1);
        assert_eq!(ukf.last_timestamp(), Some(100_000));
        assert!(evaluation.rmse.rmse().is_none());
    }

    #[test]
    fn disabled_sensor_contributes_no_nis() {
        let mut config = FilterConfig::default();
        config.radar.enabled = false;
        let mut ukf = UnscentedKalmanFilter::new(config).unwrap();
        let records = parse_str("L 1.0 1.0 0\nR 1.5 0.8 0.5 50000\nR 1.5 0.8 0.5 100000\n").unwrap();

        let evaluation = run(&mut ukf, &records);

        assert_eq!(evaluation.processed, 3);
        assert_eq!(evaluation.nis_radar.count(), 0);
    }
}
