// gismo_sim/src/error.rs

use std::path::PathBuf;

use gismo_core::error::{ConfigError, EstimatorError, SensorError};
use thiserror::Error;

/// Everything that can stop a simulation run before or while it starts.
/// Faults during the run itself are logged and counted, not returned.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("scenario file not found: {}", .0.display())]
    ScenarioNotFound(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("estimator failed to start: {0}")]
    Estimator(#[from] EstimatorError),

    #[error(transparent)]
    Sensor(#[from] SensorError),

    #[error("invalid noise model: {0}")]
    Noise(#[from] rand_distr::NormalError),

    #[error("failed to serialize scenario: {0}")]
    Serialize(#[from] toml::ser::Error),
}
