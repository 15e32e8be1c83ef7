// fusion_core/src/estimation/filters/ukf.rs

use tracing::{debug, trace, warn};

// --- Core Library Imports ---
use crate::belief::Belief;
use crate::config::FilterConfig;
use crate::error::{ConfigError, NumericalError};
use crate::estimation::initializer::Initializer;
use crate::estimation::ukf::{ukf_predict, ukf_update, Prediction, UpdateOutcome};
use crate::estimation::StateEstimator;
use crate::messages::{Observation, ObservationData, SensorKind};
use crate::models::estimation::dynamics::ctrv::CtrvModel;
use crate::models::estimation::measurement::lidar::LidarModel;
use crate::models::estimation::measurement::radar::RadarModel;
use crate::types::{elapsed_seconds, LidarVector, Timestamp};

/// The belief together with the time it refers to.
#[derive(Debug, Clone)]
struct TrackState {
    belief: Belief,
    timestamp: Timestamp,
}

/// A CTRV Unscented Kalman Filter fusing lidar and radar observations.
///
/// The filter owns a single belief. Each call to [`StateEstimator::process`]
/// either initializes it or runs predict-then-update, and the new belief is
/// only committed once every step has succeeded.
#[derive(Debug, Clone)]
pub struct UnscentedKalmanFilter {
    config: FilterConfig,
    dynamics: CtrvModel,
    lidar_model: LidarModel,
    radar_model: RadarModel,
    initializer: Initializer,

    // --- UKF-specific internal state ---
    track: Option<TrackState>,
    nis_lidar: f64,
    nis_radar: f64,
}

impl UnscentedKalmanFilter {
    pub fn new(config: FilterConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let lidar_model = LidarModel::new(config.lidar.std_px, config.lidar.std_py);
        let radar_model = RadarModel::new(
            config.radar.std_range,
            config.radar.std_bearing,
            config.radar.std_range_rate,
        );
        let initializer = Initializer {
            huge_variance: config.huge_variance,
            lidar_variances: LidarVector::new(
                config.lidar.std_px * config.lidar.std_px,
                config.lidar.std_py * config.lidar.std_py,
            ),
            radar_model: radar_model.clone(),
            params: config.unscented,
        };

        Ok(Self {
            config,
            dynamics: CtrvModel,
            lidar_model,
            radar_model,
            initializer,
            track: None,
            nis_lidar: f64::NAN,
            nis_radar: f64::NAN,
        })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.track.is_some()
    }

    /// Predicts `belief` forward by `dt` seconds with this filter's process model.
    pub fn predict(&self, belief: &Belief, dt: f64) -> Result<Prediction, NumericalError> {
        ukf_predict(
            belief,
            dt,
            &self.dynamics,
            &self.config.process_noise,
            &self.config.unscented,
        )
    }

    /// Runs the sensor update, or `None` if that sensor is disabled.
    fn update(
        &self,
        prediction: &Prediction,
        data: &ObservationData,
    ) -> Result<Option<UpdateOutcome>, NumericalError> {
        match data {
            ObservationData::Lidar(z) if self.config.lidar.enabled => {
                ukf_update(&self.lidar_model, prediction, z).map(Some)
            }
            ObservationData::Radar(z) if self.config.radar.enabled => {
                ukf_update(&self.radar_model, prediction, z).map(Some)
            }
            _ => Ok(None),
        }
    }
}

impl StateEstimator for UnscentedKalmanFilter {
    fn process(&mut self, observation: &Observation) -> Result<(), NumericalError> {
        let sensor = observation.sensor_kind();

        let Some(track) = &self.track else {
            // The very first observation only builds the prior.
            let belief = self.initializer.init(observation)?;
            if !belief.is_finite() {
                return Err(NumericalError::NonFiniteEstimate { sensor });
            }
            debug!(
                timestamp = observation.timestamp,
                %sensor,
                mean = ?belief.mean.as_slice(),
                "belief initialized"
            );
            self.track = Some(TrackState {
                belief,
                timestamp: observation.timestamp,
            });
            return Ok(());
        };

        // 1. Calculate the time delta since our last update.
        let dt = elapsed_seconds(track.timestamp, observation.timestamp);
        if dt < 0.0 {
            warn!(dt, %sensor, "observation is older than the current belief; predicting backwards");
        }

        // 2. PREDICT: Advance the belief to the exact time of the observation.
        let prediction = self.predict(&track.belief, dt)?;

        // 3. UPDATE: Fuse the observation unless its sensor is switched off.
        let belief = match self.update(&prediction, &observation.data)? {
            Some(outcome) => {
                match sensor {
                    SensorKind::Lidar => self.nis_lidar = outcome.nis,
                    SensorKind::Radar => self.nis_radar = outcome.nis,
                }
                debug!(
                    timestamp = observation.timestamp,
                    %sensor,
                    nis = outcome.nis,
                    mean = ?outcome.belief.mean.as_slice(),
                    "observation fused"
                );
                outcome.belief
            }
            None => {
                trace!(%sensor, "sensor disabled; keeping predicted belief");
                prediction.belief
            }
        };

        trace!(covariance = ?belief.covariance.as_slice(), "posterior covariance");
        self.track = Some(TrackState {
            belief,
            timestamp: observation.timestamp,
        });
        Ok(())
    }

    fn belief(&self) -> Option<&Belief> {
        self.track.as_ref().map(|track| &track.belief)
    }

    fn last_timestamp(&self) -> Option<Timestamp> {
        self.track.as_ref().map(|track| track.timestamp)
    }

    fn nis(&self, sensor: SensorKind) -> f64 {
        match sensor {
            SensorKind::Lidar => self.nis_lidar,
            SensorKind::Radar => self.nis_radar,
        }
    }
}
