// fusion_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::estimation::StateEstimator;
pub use crate::messages::{Observation, ObservationData, SensorKind};
pub use crate::models::estimation::dynamics::EstimationDynamics;
pub use crate::models::estimation::measurement::Measurement;

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::belief::{AugmentedBelief, Belief};
pub use crate::config::{FilterConfig, LidarConfig, ProcessNoiseConfig, RadarConfig};
pub use crate::error::{ConfigError, NumericalError};
pub use crate::types::{StateVariable, StateVector, Timestamp};

// --- Estimation Algorithms ---
pub use crate::estimation::filters::UnscentedKalmanFilter;
pub use crate::estimation::ukf::{ukf_predict, ukf_update, Prediction, UpdateOutcome};
pub use crate::estimation::unscented::{SigmaPoints, UkfParams};

// --- Concrete Model Implementations ---
pub use crate::models::estimation::dynamics::ctrv::CtrvModel;
pub use crate::models::estimation::measurement::lidar::LidarModel;
pub use crate::models::estimation::measurement::radar::RadarModel;
