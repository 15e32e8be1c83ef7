// fusion_sim/src/simulation/error.rs

use fusion_core::error::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to read observations from a dataset file.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("failed to walk dataset directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl DatasetError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

/// Everything that can stop the simulator before or between runs.
///
/// Numerical failures inside the filter are not here: the runner logs them
/// and moves on to the next observation.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("invalid filter configuration: {0}")]
    Filter(#[from] ConfigError),

    #[error("failed to print configuration: {0}")]
    PrintConfig(#[from] toml::ser::Error),

    #[error("invalid noise distribution: {0}")]
    Noise(#[from] rand_distr::NormalError),

    #[error("no dataset files found under {}", .0.display())]
    NoDatasets(PathBuf),

    #[error("{}: {source}", .path.display())]
    Dataset {
        path: PathBuf,
        #[source]
        source: DatasetError,
    },
}
