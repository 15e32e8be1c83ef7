// fusion_core/src/config.rs

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::estimation::unscented::UkfParams;

// =========================================================================
// == Top-Level Filter Configuration ==
// =========================================================================

/// # FilterConfig
/// Everything the filter needs to know before the first observation arrives.
/// Fixed after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub process_noise: ProcessNoiseConfig,
    pub lidar: LidarConfig,
    pub radar: RadarConfig,
    /// Stand-in for "infinite" variance on components a first observation
    /// cannot inform. Must dominate every real variance the filter sees, yet
    /// the yaw-rate sigma points it spreads (`sqrt(3 * huge_variance)` rad/s)
    /// must turn the heading well under PI in one sample period, or the
    /// wrapped heading residuals alias and the filter locks onto a false
    /// spin rate.
    pub huge_variance: f64,
    pub unscented: UkfParams,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            process_noise: ProcessNoiseConfig::default(),
            lidar: LidarConfig::default(),
            radar: RadarConfig::default(),
            huge_variance: 10.0,
            unscented: UkfParams::default(),
        }
    }
}

impl FilterConfig {
    /// Checks that every noise term and tuning scalar is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives = [
            ("process_noise.std_a", self.process_noise.std_a),
            ("process_noise.std_yawdd", self.process_noise.std_yawdd),
            ("lidar.std_px", self.lidar.std_px),
            ("lidar.std_py", self.lidar.std_py),
            ("radar.std_range", self.radar.std_range),
            ("radar.std_bearing", self.radar.std_bearing),
            ("radar.std_range_rate", self.radar.std_range_rate),
            ("huge_variance", self.huge_variance),
            ("unscented.spread_offset", self.unscented.spread_offset),
        ];
        for (name, value) in positives {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        // The smallest distribution ever sampled is the 3-dim radar reading.
        if !(self.unscented.kappa > -3.0) {
            return Err(ConfigError::KappaOutOfRange(self.unscented.kappa));
        }
        Ok(())
    }
}

// =========================================================================
// == Configuration Sub-Structs ==
// =========================================================================

/// Process noise of the CTRV model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessNoiseConfig {
    /// Longitudinal acceleration standard deviation, m/s^2.
    pub std_a: f64,
    /// Yaw acceleration standard deviation, rad/s^2.
    pub std_yawdd: f64,
}

impl Default for ProcessNoiseConfig {
    fn default() -> Self {
        Self {
            std_a: 0.5,
            std_yawdd: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LidarConfig {
    /// If false, lidar observations only advance the prediction (except the very first one).
    pub enabled: bool,
    /// Position noise standard deviations, meters.
    pub std_px: f64,
    pub std_py: f64,
}

impl Default for LidarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            std_px: 0.015,
            std_py: 0.015,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RadarConfig {
    /// If false, radar observations only advance the prediction (except the very first one).
    pub enabled: bool,
    /// Range noise standard deviation, meters.
    pub std_range: f64,
    /// Bearing noise standard deviation, radians.
    pub std_bearing: f64,
    /// Range-rate noise standard deviation, m/s.
    pub std_range_rate: f64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            std_range: 0.03,
            std_bearing: 0.003,
            std_range_rate: 0.03,
        }
    }
}
