// gismo_sim/src/simulation/sensors/imu.rs

use gismo_core::error::SensorError;
use gismo_core::sensors::InertialSensor;
use nalgebra::{Vector2, Vector3};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::SimError;
use crate::simulation::config::ImuConfig;
use crate::simulation::core::ground_truth::TruthFeed;

/// A simulated 6-DOF IMU mounted at the robot's centre, x forward, y left.
///
/// Readings are the current ground truth plus white noise; the z gyro also
/// carries a constant bias, which is what calibration is there to remove.
pub struct SimImu {
    truth: TruthFeed,
    rng: ChaCha8Rng,
    gyro_bias_dps: f64,
    accel_noise: [Normal<f64>; 2], // X, Y
    gyro_noise: [Normal<f64>; 3],  // X, Y, Z
    failure_probability: f64,
    failures: u64,
}

impl SimImu {
    pub fn new(config: &ImuConfig, truth: TruthFeed, rng: ChaCha8Rng) -> Result<Self, SimError> {
        let accel = Normal::new(0.0, config.accel_noise_stddev_mps2)?;
        let gyro = Normal::new(0.0, config.gyro_noise_stddev_dps)?;
        Ok(Self {
            truth,
            rng,
            gyro_bias_dps: config.gyro_bias_dps,
            accel_noise: [accel; 2],
            gyro_noise: [gyro; 3],
            failure_probability: config.failure_probability,
            failures: 0,
        })
    }

    /// Number of reads that were made to fail.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    fn maybe_fail(&mut self, what: &str) -> Result<(), SensorError> {
        if self.failure_probability > 0.0 && self.rng.gen_bool(self.failure_probability) {
            self.failures += 1;
            return Err(SensorError::Read {
                sensor: format!("imu {}", what),
                reason: "simulated I2C timeout".to_string(),
            });
        }
        Ok(())
    }
}

impl InertialSensor for SimImu {
    fn read_gyro(&mut self) -> Result<Vector3<f64>, SensorError> {
        self.maybe_fail("gyro")?;
        let truth = self.truth.get();
        let rng = &mut self.rng;
        Ok(Vector3::new(
            self.gyro_noise[0].sample(rng),
            self.gyro_noise[1].sample(rng),
            truth.yaw_rate.to_degrees() + self.gyro_bias_dps + self.gyro_noise[2].sample(rng),
        ))
    }

    fn read_accel(&mut self) -> Result<Vector2<f64>, SensorError> {
        self.maybe_fail("accel")?;
        let truth = self.truth.get();
        let rng = &mut self.rng;
        Ok(Vector2::new(
            truth.body_accel.x + self.accel_noise[0].sample(rng),
            truth.body_accel.y + self.accel_noise[1].sample(rng),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::core::ground_truth::GroundTruthState;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;

    fn noiseless() -> ImuConfig {
        ImuConfig {
            gyro_bias_dps: 0.5,
            gyro_noise_stddev_dps: 0.0,
            accel_noise_stddev_mps2: 0.0,
            failure_probability: 0.0,
        }
    }

    #[test]
    fn reports_truth_plus_bias() {
        let truth = TruthFeed::default();
        let mut imu = SimImu::new(&noiseless(), truth.clone(), ChaCha8Rng::seed_from_u64(0)).unwrap();

        truth.set(GroundTruthState {
            yaw_rate: 10f64.to_radians(),
            body_accel: Vector2::new(0.3, -0.1),
            ..Default::default()
        });

        let gyro = imu.read_gyro().unwrap();
        assert_abs_diff_eq!(gyro.z, 10.5, epsilon = 1e-9);
        assert_eq!(gyro.x, 0.0);
        assert_eq!(imu.read_accel().unwrap(), Vector2::new(0.3, -0.1));
    }

    #[test]
    fn noise_is_centred() {
        let config = ImuConfig {
            gyro_noise_stddev_dps: 0.2,
            ..noiseless()
        };
        let mut imu = SimImu::new(&config, TruthFeed::default(), ChaCha8Rng::seed_from_u64(3)).unwrap();
        let n = 2000;
        let mean = (0..n).map(|_| imu.read_gyro().unwrap().z).sum::<f64>() / n as f64;
        assert_abs_diff_eq!(mean, 0.5, epsilon = 0.03);
    }

    #[test]
    fn injected_failures_surface_as_read_errors() {
        let config = ImuConfig {
            failure_probability: 1.0,
            ..noiseless()
        };
        let mut imu = SimImu::new(&config, TruthFeed::default(), ChaCha8Rng::seed_from_u64(0)).unwrap();
        assert!(matches!(imu.read_sample(), Err(SensorError::Read { .. })));
        assert_eq!(imu.failures(), 1);
    }
}
