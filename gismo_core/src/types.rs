// gismo_core/src/types.rs

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

// --- Core Data Structures ---

/// The robot's believed planar state in the fixed world frame.
///
/// The world frame origin is wherever the robot stood when its
/// `PoseEstimator` was constructed. Heading is in degrees, zero along the
/// initial forward direction, counter-clockwise positive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2 {
    /// (x, y) in meters.
    pub position: Vector2<f64>,
    /// Heading in degrees.
    pub heading: f64,
}

impl Pose2 {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            position: Vector2::new(x, y),
            heading,
        }
    }

    /// Euclidean distance between the positions of two poses.
    pub fn distance_to(&self, other: &Pose2) -> f64 {
        (self.position - other.position).norm()
    }
}

/// A signed cell coordinate. Signed so that cells computed off the edge of
/// the grid can still be represented (and then skipped).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridIndex {
    pub x: i64,
    pub y: i64,
}

impl GridIndex {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<(i64, i64)> for GridIndex {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

/// One instantaneous inertial sample as handed out by an `InertialSensor`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImuSample {
    /// Linear acceleration (x, y) in m/s^2, sensor frame.
    pub accel: Vector2<f64>,
    /// Angular rate (x, y, z) in deg/s.
    pub gyro: Vector3<f64>,
}

/// Drop-off detectors at the front corners of the chassis. `true` means the
/// floor has ended under that sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeReading {
    pub left: bool,
    pub right: bool,
}

impl EdgeReading {
    pub fn any(&self) -> bool {
        self.left || self.right
    }
}
