// gismo_sim/src/simulation/config/mod.rs

//! This module handles loading and validating the scenario configuration
//! from disk.

pub mod structs;

use std::path::Path;

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use gismo_core::error::ConfigError;
use log::info;

use crate::error::SimError;
pub use structs::{
    BoxObstacle, EdgeSensorConfig, ImuConfig, MappingSchedule, RobotConfig, ScenarioConfig,
    SimulationSettings, TofConfig, WorldConfig,
};

/// Loads a scenario, layering the file over the built-in defaults.
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig, SimError> {
    info!("Loading scenario from: {}", path.display());
    if !path.exists() {
        return Err(SimError::ScenarioNotFound(path.to_path_buf()));
    }

    let config: ScenarioConfig = Figment::from(Serialized::defaults(ScenarioConfig::default()))
        .merge(Toml::file(path))
        .extract()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    config.validate()?;
    Ok(config)
}

/// Parses a scenario from an in-memory TOML string.
pub fn parse_scenario(toml_text: &str) -> Result<ScenarioConfig, SimError> {
    let config: ScenarioConfig = Figment::from(Serialized::defaults(ScenarioConfig::default()))
        .merge(Toml::string(toml_text))
        .extract()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    config.validate()?;
    Ok(config)
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be positive"),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be non-negative"),
        })
    }
}

impl ScenarioConfig {
    /// Checks every section, core settings included.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.map.validate()?;
        self.range.validate()?;
        self.calibration.validate()?;
        self.stuck.validate()?;

        positive("simulation.duration_s", self.simulation.duration_s)?;
        positive("simulation.dt_s", self.simulation.dt_s)?;
        positive("simulation.log_interval_s", self.simulation.log_interval_s)?;

        positive("world.width_m", self.world.width_m)?;
        positive("world.height_m", self.world.height_m)?;
        let [sx, sy] = self.world.start;
        if !(sx > 0.0 && sx < self.world.width_m && sy > 0.0 && sy < self.world.height_m) {
            return Err(ConfigError::Invalid {
                field: "world.start",
                reason: format!("({sx}, {sy}) is outside the room"),
            });
        }
        for obstacle in &self.world.obstacles {
            positive("world.obstacles.size", obstacle.size[0])?;
            positive("world.obstacles.size", obstacle.size[1])?;
        }
        for drop_off in &self.world.drop_offs {
            positive("world.drop_offs.size", drop_off.size[0])?;
            positive("world.drop_offs.size", drop_off.size[1])?;
        }

        positive("robot.radius_m", self.robot.radius_m)?;
        non_negative("robot.forward_speed_mps", self.robot.forward_speed_mps)?;
        non_negative("robot.turn_rate_dps", self.robot.turn_rate_dps)?;
        non_negative("robot.ramp_time_s", self.robot.ramp_time_s)?;
        non_negative("robot.turn_duration_s", self.robot.turn_duration_s)?;
        non_negative("robot.reverse_duration_s", self.robot.reverse_duration_s)?;
        non_negative("robot.obstacle_distance_cm", self.robot.obstacle_distance_cm)?;

        non_negative("imu.gyro_noise_stddev_dps", self.imu.gyro_noise_stddev_dps)?;
        non_negative("imu.accel_noise_stddev_mps2", self.imu.accel_noise_stddev_mps2)?;
        if !(0.0..=1.0).contains(&self.imu.failure_probability) {
            return Err(ConfigError::Invalid {
                field: "imu.failure_probability",
                reason: format!("{} must lie in [0, 1]", self.imu.failure_probability),
            });
        }

        positive("tof.max_range_m", self.tof.max_range_m)?;
        non_negative("tof.noise_stddev_cm", self.tof.noise_stddev_cm)?;
        non_negative("edge.forward_offset_m", self.edge.forward_offset_m)?;
        non_negative("edge.lateral_offset_m", self.edge.lateral_offset_m)?;

        non_negative("mapping.update_interval_s", self.mapping.update_interval_s)?;
        positive("mapping.display_interval_s", self.mapping.display_interval_s)?;
        Ok(())
    }
}
