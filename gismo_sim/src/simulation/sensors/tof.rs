// gismo_sim/src/simulation/sensors/tof.rs

use std::sync::Arc;

use gismo_core::error::SensorError;
use gismo_core::sensors::RangeSensor;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::SimError;
use crate::simulation::config::TofConfig;
use crate::simulation::core::ground_truth::TruthFeed;
use crate::simulation::world::World;

/// A forward-facing time-of-flight ranger at the robot's centre.
pub struct SimTof {
    world: Arc<World>,
    truth: TruthFeed,
    rng: ChaCha8Rng,
    noise: Normal<f64>,
    max_range_m: f64,
}

impl SimTof {
    pub fn new(
        config: &TofConfig,
        world: Arc<World>,
        truth: TruthFeed,
        rng: ChaCha8Rng,
    ) -> Result<Self, SimError> {
        Ok(Self {
            world,
            truth,
            rng,
            noise: Normal::new(0.0, config.noise_stddev_cm)?,
            max_range_m: config.max_range_m,
        })
    }
}

impl RangeSensor for SimTof {
    fn read_distance_cm(&mut self) -> Result<Option<f64>, SensorError> {
        let truth = self.truth.get();
        let reading = self
            .world
            .raycast(&truth.position, truth.heading, self.max_range_m)
            .map(|d| (d * 100.0 + self.noise.sample(&mut self.rng)).max(0.0));
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::core::ground_truth::GroundTruthState;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector2;
    use rand::SeedableRng;

    fn tof(max_range_m: f64, truth: TruthFeed) -> SimTof {
        let config = TofConfig {
            max_range_m,
            noise_stddev_cm: 0.0,
        };
        let world = Arc::new(World::new(4.0, 4.0, vec![]));
        SimTof::new(&config, world, truth, ChaCha8Rng::seed_from_u64(0)).unwrap()
    }

    #[test]
    fn measures_distance_to_wall_in_cm() {
        let truth = TruthFeed::new(GroundTruthState::at(Vector2::new(3.0, 2.0), 0.0));
        let mut sensor = tof(2.0, truth);
        assert_abs_diff_eq!(sensor.read_distance_cm().unwrap().unwrap(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn nothing_in_range_is_none() {
        let truth = TruthFeed::new(GroundTruthState::at(Vector2::new(0.5, 2.0), 0.0));
        let mut sensor = tof(2.0, truth);
        assert_eq!(sensor.read_distance_cm().unwrap(), None);
    }
}
