// fusion_sim/src/simulation/scenario.rs

use fusion_core::config::FilterConfig;
use fusion_core::messages::Observation;
use fusion_core::models::estimation::dynamics::ctrv::CtrvModel;
use fusion_core::models::estimation::dynamics::EstimationDynamics;
use fusion_core::models::estimation::measurement::lidar::LidarModel;
use fusion_core::models::estimation::measurement::radar::RadarModel;
use fusion_core::models::estimation::measurement::Measurement;
use fusion_core::types::{AugmentedVector, StateVector, Timestamp};
use fusion_core::utils::angles::normalize_angle;
use rand_distr::{Distribution, Normal};

use crate::simulation::core::config::{ScenarioConfig, SensorPattern};
use crate::simulation::core::prng::SimulationRng;
use crate::simulation::dataset::{DatasetRecord, GroundTruth};
use crate::simulation::error::SimError;

/// Zero-mean Gaussian samplers for every noise source in a scenario.
struct NoiseModel {
    accel: Normal<f64>,
    yaw_accel: Normal<f64>,
    lidar: [Normal<f64>; 2],
    radar: [Normal<f64>; 3],
}

impl NoiseModel {
    fn new(filter: &FilterConfig) -> Result<Self, SimError> {
        Ok(Self {
            accel: Normal::new(0.0, filter.process_noise.std_a)?,
            yaw_accel: Normal::new(0.0, filter.process_noise.std_yawdd)?,
            lidar: [
                Normal::new(0.0, filter.lidar.std_px)?,
                Normal::new(0.0, filter.lidar.std_py)?,
            ],
            radar: [
                Normal::new(0.0, filter.radar.std_range)?,
                Normal::new(0.0, filter.radar.std_bearing)?,
                Normal::new(0.0, filter.radar.std_range_rate)?,
            ],
        })
    }
}

fn ground_truth(state: &StateVector) -> GroundTruth {
    let (v, phi) = (state[2], state[3]);
    GroundTruth {
        px: state[0],
        py: state[1],
        vx: v * phi.cos(),
        vy: v * phi.sin(),
    }
}

/// Generates one noisy CTRV trajectory.
///
/// The truth moves with the same CTRV propagation the filter uses, with a
/// fresh acceleration and yaw acceleration drawn every step, and each
/// observation is the sensor model's prediction of the true state plus noise
/// drawn with the filter's own sensor std-devs.
pub fn generate(
    scenario: &ScenarioConfig,
    filter: &FilterConfig,
    rng: &mut SimulationRng,
) -> Result<Vec<DatasetRecord>, SimError> {
    let noise = NoiseModel::new(filter)?;
    let dynamics = CtrvModel;
    let lidar = LidarModel::new(filter.lidar.std_px, filter.lidar.std_py);
    let radar = RadarModel::new(
        filter.radar.std_range,
        filter.radar.std_bearing,
        filter.radar.std_range_rate,
    );
    let dt = scenario.sample_period_us as f64 / 1e6;

    let mut state = StateVector::from_column_slice(&scenario.initial_state);
    let mut records = Vec::with_capacity(scenario.steps);

    for step in 0..scenario.steps {
        // --- 1. Advance the truth (the first step observes the initial state) ---
        if step > 0 {
            let a = noise.accel.sample(&mut rng.0);
            let yaw_accel = noise.yaw_accel.sample(&mut rng.0);
            let mut augmented = AugmentedVector::zeros();
            augmented.fixed_rows_mut::<5>(0).copy_from(&state);
            augmented[5] = a;
            augmented[6] = yaw_accel;
            state = dynamics.propagate(&augmented, dt);
            state[3] = normalize_angle(state[3]);
        }

        // --- 2. Observe it with the scheduled sensor ---
        let timestamp = step as Timestamp * scenario.sample_period_us;
        let use_lidar = match scenario.pattern {
            SensorPattern::Alternating => step % 2 == 0,
            SensorPattern::LidarOnly => true,
            SensorPattern::RadarOnly => false,
        };

        let observation = if use_lidar {
            let z = lidar.predict_measurement(&state);
            Observation::lidar(
                timestamp,
                z[0] + noise.lidar[0].sample(&mut rng.0),
                z[1] + noise.lidar[1].sample(&mut rng.0),
            )
        } else {
            let z = radar.predict_measurement(&state);
            Observation::radar(
                timestamp,
                z[0] + noise.radar[0].sample(&mut rng.0),
                normalize_angle(z[1] + noise.radar[1].sample(&mut rng.0)),
                z[2] + noise.radar[2].sample(&mut rng.0),
            )
        };

        records.push(DatasetRecord {
            observation,
            ground_truth: Some(ground_truth(&state)),
        });
    }

    Ok(records)
}
