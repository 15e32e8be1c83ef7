// fusion_core/src/error.rs

use crate::messages::SensorKind;
use thiserror::Error;

/// The only way processing an observation can fail.
///
/// A `NumericalError` aborts the current observation. The filter's belief is
/// left exactly as it was before the call, so the next observation can still
/// be processed normally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericalError {
    /// The Cholesky decomposition of a covariance matrix did not exist.
    #[error("covariance matrix of dimension {dim} is not positive definite")]
    NotPositiveDefinite { dim: usize },

    /// The innovation covariance `S` could not be inverted.
    #[error("innovation covariance for {sensor} update is singular")]
    SingularInnovation { sensor: SensorKind },

    /// A step produced NaN or infinite values, typically from a non-finite reading.
    #[error("{sensor} observation produced a non-finite estimate")]
    NonFiniteEstimate { sensor: SensorKind },
}

/// Rejected filter configuration, reported at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{name}` must be a positive, finite value (got {value})")]
    NotPositive { name: &'static str, value: f64 },

    #[error("`kappa` must be greater than -3 (got {0})")]
    KappaOutOfRange(f64),
}
