// gismo_sim/src/simulation/core/ground_truth.rs

use std::sync::{Arc, Mutex, PoisonError};

use gismo_core::types::Pose2;
use nalgebra::{Rotation2, Vector2};

/// The true kinematic state of the simulated robot, in room coordinates.
///
/// This is the single source of truth the simulated sensors sample from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroundTruthState {
    /// Position in the room, meters.
    pub position: Vector2<f64>,
    /// Heading in radians, counter-clockwise from room +x.
    pub heading: f64,
    /// Signed forward speed, m/s.
    pub speed: f64,
    /// Yaw rate, rad/s.
    pub yaw_rate: f64,
    /// Body-frame acceleration: (forward, left), m/s^2.
    pub body_accel: Vector2<f64>,
    /// Whether the last step was blocked by a wall or obstacle.
    pub stalled: bool,
}

impl GroundTruthState {
    pub fn at(position: Vector2<f64>, heading: f64) -> Self {
        Self {
            position,
            heading,
            ..Default::default()
        }
    }

    /// Expresses this state in the frame the estimator starts in: origin at
    /// `origin`, x axis along `origin_heading` (radians). Heading is returned
    /// in degrees, like the estimator's.
    pub fn relative_to(&self, origin: &Vector2<f64>, origin_heading: f64) -> Pose2 {
        let to_start = Rotation2::new(-origin_heading);
        Pose2 {
            position: to_start * (self.position - origin),
            heading: (self.heading - origin_heading).to_degrees(),
        }
    }
}

/// Shared, lockable ground truth. The vehicle writes it once per tick, the
/// sensors read it whenever they are sampled.
#[derive(Debug, Clone, Default)]
pub struct TruthFeed {
    inner: Arc<Mutex<GroundTruthState>>,
}

impl TruthFeed {
    pub fn new(state: GroundTruthState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    pub fn get(&self) -> GroundTruthState {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, state: GroundTruthState) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}
