// gismo_core/src/estimation/mod.rs

use crate::error::EstimatorError;
use crate::types::Pose2;

/// The contract for any algorithm that performs the "State Estimator" role.
/// Its sole responsibility is to track the robot's planar pose.
pub trait StateEstimator: Send {
    /// Advances the estimate by one control-loop tick, sampling whatever
    /// sensors the implementation owns.
    fn update(&mut self) -> Result<(), EstimatorError>;

    /// Returns the current best estimate of the pose.
    fn pose(&self) -> Pose2;
}

pub mod dead_reckoning;

pub use dead_reckoning::{GyroCalibration, PoseEstimator};
