// gismo_core/src/sensors.rs

//! Supplier contracts between the core and whatever produces raw readings:
//! real drivers on the robot, fakes in tests, simulated sensors in `gismo_sim`.

use crate::error::SensorError;
use crate::types::{EdgeReading, ImuSample};
use nalgebra::{Vector2, Vector3};

/// The contract for an inertial measurement unit.
///
/// Each call returns the latest instantaneous sample; no buffering is implied.
pub trait InertialSensor: Send {
    /// Angular rate about (x, y, z) in deg/s.
    fn read_gyro(&mut self) -> Result<Vector3<f64>, SensorError>;

    /// Linear acceleration along (x, y) in m/s^2.
    fn read_accel(&mut self) -> Result<Vector2<f64>, SensorError>;

    /// Reads acceleration then angular rate as one sample.
    fn read_sample(&mut self) -> Result<ImuSample, SensorError> {
        let accel = self.read_accel()?;
        let gyro = self.read_gyro()?;
        Ok(ImuSample { accel, gyro })
    }
}

/// The contract for a single-beam ranging sensor (time-of-flight, ultrasonic).
pub trait RangeSensor: Send {
    /// Distance to the nearest target in centimeters, or `None` when the
    /// sensor has no valid return this cycle.
    fn read_distance_cm(&mut self) -> Result<Option<f64>, SensorError>;
}

/// The contract for the pair of downward-facing edge (cliff) sensors.
pub trait EdgeSensor: Send {
    fn read_edges(&mut self) -> Result<EdgeReading, SensorError>;
}

impl<T: InertialSensor + ?Sized> InertialSensor for Box<T> {
    fn read_gyro(&mut self) -> Result<Vector3<f64>, SensorError> {
        (**self).read_gyro()
    }

    fn read_accel(&mut self) -> Result<Vector2<f64>, SensorError> {
        (**self).read_accel()
    }
}

impl<T: RangeSensor + ?Sized> RangeSensor for Box<T> {
    fn read_distance_cm(&mut self) -> Result<Option<f64>, SensorError> {
        (**self).read_distance_cm()
    }
}

impl<T: EdgeSensor + ?Sized> EdgeSensor for Box<T> {
    fn read_edges(&mut self) -> Result<EdgeReading, SensorError> {
        (**self).read_edges()
    }
}
