// fusion_core/src/messages.rs

use crate::types::{LidarVector, RadarVector, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

// =========================================================================
// == Sensor Identification ==
// =========================================================================

/// The two sensor types the filter knows how to fuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Lidar,
    Radar,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Lidar => f.write_str("lidar"),
            SensorKind::Radar => f.write_str("radar"),
        }
    }
}

// =========================================================================
// == Observation Messages ==
// =========================================================================

/// Raw readings carried by an observation, tagged by sensor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObservationData {
    /// Cartesian position `[px, py]` in meters.
    Lidar(LidarVector),
    /// Polar `[range, bearing, range_rate]` in meters, radians and m/s.
    Radar(RadarVector),
}

/// A single timestamped reading from one of the sensors.
/// Owned by the caller; the filter only ever reads it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    /// Integer microseconds.
    pub timestamp: Timestamp,
    pub data: ObservationData,
}

impl Observation {
    pub fn lidar(timestamp: Timestamp, px: f64, py: f64) -> Self {
        Self {
            timestamp,
            data: ObservationData::Lidar(LidarVector::new(px, py)),
        }
    }

    pub fn radar(timestamp: Timestamp, range: f64, bearing: f64, range_rate: f64) -> Self {
        Self {
            timestamp,
            data: ObservationData::Radar(RadarVector::new(range, bearing, range_rate)),
        }
    }

    pub fn sensor_kind(&self) -> SensorKind {
        match self.data {
            ObservationData::Lidar(_) => SensorKind::Lidar,
            ObservationData::Radar(_) => SensorKind::Radar,
        }
    }
}
