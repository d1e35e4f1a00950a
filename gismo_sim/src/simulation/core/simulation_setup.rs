// gismo_sim/src/simulation/core/simulation_setup.rs

use std::sync::Arc;

use gismo_core::clock::ManualClock;
use gismo_core::error::ConfigError;
use gismo_core::estimation::PoseEstimator;
use gismo_core::mapping::{OccupancyGrid, SharedOccupancyGrid};
use log::info;
use nalgebra::Vector2;

use crate::error::SimError;
use crate::simulation::config::ScenarioConfig;
use crate::simulation::control_loop::{ControlLoop, LoopParts};
use crate::simulation::core::ground_truth::{GroundTruthState, TruthFeed};
use crate::simulation::core::prng::SimulationRng;
use crate::simulation::sensors::{SimEdgeSensors, SimImu, SimTof};
use crate::simulation::vehicle::DiffDriveRobot;
use crate::simulation::world::World;

/// The loop as the binary runs it.
pub type GismoLoop = ControlLoop<PoseEstimator<SimImu, ManualClock>, SharedOccupancyGrid, SimTof>;

/// Wires up the world, the robot, its sensors, the estimator and the map.
///
/// The estimator is constructed here, so gyroscope calibration runs (on
/// simulated time, with the robot standing still) before this returns.
pub fn build_simulation(config: &ScenarioConfig) -> Result<GismoLoop, SimError> {
    let mut rng = SimulationRng::new(config.simulation.seed);

    // --- World ---
    let world = Arc::new(World::from_config(&config.world));
    let start_position = Vector2::from(config.world.start);
    if !world.is_free(&start_position, config.robot.radius_m) {
        return Err(ConfigError::Invalid {
            field: "world.start",
            reason: "the robot does not fit at its start position".to_string(),
        }
        .into());
    }
    if world.is_drop_off(&start_position) {
        return Err(ConfigError::Invalid {
            field: "world.start",
            reason: "the robot would start over a drop-off".to_string(),
        }
        .into());
    }
    info!(
        "Room {:.1} x {:.1} m with {} obstacle(s) and {} drop-off(s)",
        config.world.width_m,
        config.world.height_m,
        world.obstacles().len(),
        world.drop_offs().len()
    );

    // --- Robot & ground truth ---
    let start = GroundTruthState::at(start_position, config.world.start_heading_deg.to_radians());
    let truth = TruthFeed::new(start);
    let robot = DiffDriveRobot::new(config.robot.clone(), start, truth.clone());

    // --- Sensors ---
    let clock = ManualClock::new(0.0);
    let imu = SimImu::new(&config.imu, truth.clone(), rng.fork())?;
    let tof = SimTof::new(&config.tof, world.clone(), truth.clone(), rng.fork())?;
    let edges = SimEdgeSensors::new(&config.edge, world.clone(), truth);

    // --- Estimation & mapping ---
    let estimator = PoseEstimator::new(imu, clock.clone(), &config.calibration)?;
    let grid = OccupancyGrid::new(config.map.clone(), config.range.clone())?;
    let mapper = SharedOccupancyGrid::new(grid);

    Ok(ControlLoop::new(
        config,
        LoopParts {
            estimator,
            mapper,
            ranger: tof,
            edges: Box::new(edges),
            robot,
            world,
            clock,
            rng: rng.fork(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::config::BoxObstacle;
    use gismo_core::error::EstimatorError;

    #[test]
    fn calibration_runs_while_building() {
        let mut config = ScenarioConfig::default();
        config.simulation.seed = Some(5);
        config.imu.gyro_noise_stddev_dps = 0.0;
        let sim = build_simulation(&config).unwrap();
        let estimator = sim.estimator();
        assert!((estimator.gyro_bias() - config.imu.gyro_bias_dps).abs() < 1e-9);
        assert_eq!(estimator.calibration().samples, config.calibration.samples);
    }

    #[test]
    fn blocked_start_is_rejected() {
        let mut config = ScenarioConfig::default();
        config.world.obstacles.push(BoxObstacle {
            center: config.world.start,
            size: [0.5, 0.5],
        });
        let err = build_simulation(&config).err().unwrap();
        assert!(matches!(
            err,
            SimError::Config(ConfigError::Invalid { field: "world.start", .. })
        ));
    }

    #[test]
    fn start_over_a_drop_off_is_rejected() {
        let mut config = ScenarioConfig::default();
        config.world.drop_offs.push(BoxObstacle {
            center: config.world.start,
            size: [1.0, 1.0],
        });
        let err = build_simulation(&config).err().unwrap();
        assert!(matches!(
            err,
            SimError::Config(ConfigError::Invalid { field: "world.start", .. })
        ));
    }

    #[test]
    fn failing_imu_aborts_calibration() {
        let mut config = ScenarioConfig::default();
        config.simulation.seed = Some(1);
        config.imu.failure_probability = 1.0;
        let err = build_simulation(&config).err().unwrap();
        assert!(matches!(
            err,
            SimError::Estimator(EstimatorError::Calibration { sample: 0, .. })
        ));
    }
}
