// gismo_core/src/error.rs

use thiserror::Error;

/// Failures reported by a sensor supplier. The core never retries; whoever
/// owns the driver decides what to do about these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SensorError {
    #[error("sensor '{0}' is unavailable")]
    Unavailable(String),

    #[error("failed to read '{sensor}': {reason}")]
    Read { sensor: String, reason: String },
}

/// Errors raised by the dead-reckoning estimator.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimatorError {
    /// The gyroscope could not be sampled while computing its bias. The
    /// estimator refuses to start with a partial bias.
    #[error("gyroscope calibration failed at sample {sample}: {source}")]
    Calibration {
        sample: usize,
        #[source]
        source: SensorError,
    },

    #[error("invalid calibration settings: {0}")]
    InvalidCalibration(String),

    #[error(transparent)]
    Sensor(#[from] SensorError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to load configuration: {0}")]
    Load(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
