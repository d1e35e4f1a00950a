// gismo_sim/src/simulation/sensors/edge.rs

use std::sync::Arc;

use gismo_core::error::SensorError;
use gismo_core::sensors::EdgeSensor;
use gismo_core::types::EdgeReading;
use nalgebra::{Rotation2, Vector2};

use crate::simulation::config::EdgeSensorConfig;
use crate::simulation::core::ground_truth::TruthFeed;
use crate::simulation::world::World;

/// Two downward-facing floor detectors at the front corners of the chassis.
pub struct SimEdgeSensors {
    world: Arc<World>,
    truth: TruthFeed,
    left_offset: Vector2<f64>,
    right_offset: Vector2<f64>,
}

impl SimEdgeSensors {
    pub fn new(config: &EdgeSensorConfig, world: Arc<World>, truth: TruthFeed) -> Self {
        Self {
            world,
            truth,
            left_offset: Vector2::new(config.forward_offset_m, config.lateral_offset_m),
            right_offset: Vector2::new(config.forward_offset_m, -config.lateral_offset_m),
        }
    }
}

impl EdgeSensor for SimEdgeSensors {
    fn read_edges(&mut self) -> Result<EdgeReading, SensorError> {
        let truth = self.truth.get();
        let to_room = Rotation2::new(truth.heading);
        let over_gap = |offset: &Vector2<f64>| {
            self.world
                .is_drop_off(&(truth.position + to_room * *offset))
        };
        Ok(EdgeReading {
            left: over_gap(&self.left_offset),
            right: over_gap(&self.right_offset),
        })
    }
}
