// gismo_core/src/estimation/dead_reckoning.rs

use log::{debug, info};
use nalgebra::{DVector, Vector2};

use crate::clock::Clock;
use crate::config::CalibrationConfig;
use crate::error::EstimatorError;
use crate::estimation::StateEstimator;
use crate::sensors::InertialSensor;
use crate::types::{ImuSample, Pose2};
use crate::utils::integrators::{rk4_weighted_sum, Integrator, RK4};

// =========================================================================
// == Gyroscope Calibration ==
// =========================================================================

/// The result of averaging stationary gyroscope samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GyroCalibration {
    /// Mean z-axis angular rate while stationary, deg/s.
    pub bias: f64,
    /// How many samples went into the mean.
    pub samples: usize,
}

impl GyroCalibration {
    /// Samples the gyroscope `config.samples` times, pausing `config.delay_s`
    /// between reads, and averages the z rate.
    ///
    /// The robot must be kept still for the whole run. Any failed read aborts
    /// calibration: a bias computed from a partial set of samples is never
    /// returned.
    pub fn run<S, C>(
        sensor: &mut S,
        clock: &C,
        config: &CalibrationConfig,
    ) -> Result<Self, EstimatorError>
    where
        S: InertialSensor + ?Sized,
        C: Clock + ?Sized,
    {
        config
            .validate()
            .map_err(|e| EstimatorError::InvalidCalibration(e.to_string()))?;

        info!(
            "Calibrating gyroscope over {} samples (~{:.1} s). Keep the robot still.",
            config.samples,
            config.expected_duration_s()
        );

        let start = clock.now();
        let delay = config.delay();
        let mut total_z = 0.0;

        for i in 0..config.samples {
            let gyro = sensor
                .read_gyro()
                .map_err(|source| EstimatorError::Calibration { sample: i, source })?;
            total_z += gyro.z;

            if config.progress_every > 0 && (i + 1) % config.progress_every == 0 {
                let remaining = config.expected_duration_s() - (clock.now() - start);
                debug!(
                    "Calibrating... {}/{} samples, {:.1} s remaining",
                    i + 1,
                    config.samples,
                    remaining.max(0.0)
                );
            }
            clock.sleep(delay);
        }

        let bias = total_z / config.samples as f64;
        info!("Gyroscope calibration complete. Bias: {:.2} deg/s", bias);

        Ok(Self {
            bias,
            samples: config.samples,
        })
    }
}

// =========================================================================
// == Pose Estimator ==
// =========================================================================

/// Dead-reckoning pose estimator driven by a 6-DOF IMU.
///
/// Heading is the integral of the bias-corrected yaw rate. Position uses the
/// RK4 stage structure: the acceleration is projected through the heading at
/// the start, midpoint and end of the step, so turning while accelerating is
/// accounted for within the step rather than only at its start.
///
/// There is no velocity state. Each step's displacement is the weighted
/// stage acceleration scaled by `dt * dt`, which drifts quickly on real
/// hardware; it is a rough estimate, not a navigation solution.
pub struct PoseEstimator<S, C> {
    sensor: S,
    clock: C,
    calibration: GyroCalibration,
    position: Vector2<f64>,
    heading: f64,
    last_time: f64,
    last_sample: Option<ImuSample>,
}

impl<S, C> PoseEstimator<S, C>
where
    S: InertialSensor,
    C: Clock,
{
    /// Calibrates the gyroscope and starts the estimator at the origin.
    ///
    /// Blocks for roughly `config.samples * config.delay_s` seconds of `clock`
    /// time. A sensor failure during calibration is returned as
    /// [`EstimatorError::Calibration`].
    pub fn new(mut sensor: S, clock: C, config: &CalibrationConfig) -> Result<Self, EstimatorError> {
        let calibration = GyroCalibration::run(&mut sensor, &clock, config)?;
        let last_time = clock.now();

        Ok(Self {
            sensor,
            clock,
            calibration,
            position: Vector2::zeros(),
            heading: 0.0,
            last_time,
            last_sample: None,
        })
    }

    /// Samples the IMU once and integrates the step since the previous call.
    ///
    /// A failed read is returned unchanged and leaves the state untouched,
    /// including the step start time: the next successful call integrates
    /// over the whole gap.
    pub fn update(&mut self) -> Result<(), EstimatorError> {
        let now = self.clock.now();
        let sample = self.sensor.read_sample()?;

        let dt = now - self.last_time;
        self.last_time = now;
        self.last_sample = Some(sample);

        self.integrate(&sample, dt);
        Ok(())
    }

    fn integrate(&mut self, sample: &ImuSample, dt: f64) {
        let accel = sample.accel;
        let gyro_z = sample.gyro.z - self.calibration.bias;

        // Acceleration projected through a stage heading.
        let stage = |heading_deg: f64| {
            let h = heading_deg.to_radians();
            Vector2::new(accel.x * h.cos(), accel.y * h.sin())
        };

        // The yaw rate is held constant over the step, so every heading stage
        // sees the same derivative.
        let k1_heading = gyro_z;
        let k1_pos = stage(self.heading);

        let mid_heading = self.heading + k1_heading * dt / 2.0;
        let k2_pos = stage(mid_heading);
        let k3_heading = gyro_z;
        let k3_pos = stage(mid_heading);

        let end_heading = self.heading + k3_heading * dt;
        let k4_pos = stage(end_heading);

        let displacement = Vector2::new(
            rk4_weighted_sum(k1_pos.x, k2_pos.x, k3_pos.x, k4_pos.x),
            rk4_weighted_sum(k1_pos.y, k2_pos.y, k3_pos.y, k4_pos.y),
        ) * dt
            * dt;

        let yaw_rate = |_x: &DVector<f64>, _t: f64| DVector::from_element(1, gyro_z);
        let heading = RK4.step(
            &yaw_rate,
            &DVector::from_element(1, self.heading),
            self.last_time - dt,
            self.last_time,
        );

        self.heading = heading[0];
        self.position += displacement;
    }

    /// Current position estimate (x, y) in meters.
    pub fn get_position(&self) -> Vector2<f64> {
        self.position
    }

    /// Current heading estimate in degrees.
    pub fn get_heading(&self) -> f64 {
        self.heading
    }

    pub fn gyro_bias(&self) -> f64 {
        self.calibration.bias
    }

    pub fn calibration(&self) -> &GyroCalibration {
        &self.calibration
    }

    /// The raw sample consumed by the most recent successful `update`.
    pub fn last_sample(&self) -> Option<&ImuSample> {
        self.last_sample.as_ref()
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<S, C> StateEstimator for PoseEstimator<S, C>
where
    S: InertialSensor,
    C: Clock,
{
    fn update(&mut self) -> Result<(), EstimatorError> {
        PoseEstimator::update(self)
    }

    fn pose(&self) -> Pose2 {
        Pose2 {
            position: self.position,
            heading: self.heading,
        }
    }
}
