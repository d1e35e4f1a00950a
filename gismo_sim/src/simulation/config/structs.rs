// gismo_sim/src/simulation/config/structs.rs

use gismo_core::config::{CalibrationConfig, MapConfig, RangeConfig, StuckConfig};
use serde::{Deserialize, Serialize};

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

/// # ScenarioConfig
/// Everything a simulation run needs. This struct is the root of the data
/// parsed from a `scenario.toml` file; every section is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    pub simulation: SimulationSettings,
    pub world: WorldConfig,
    pub robot: RobotConfig,
    pub imu: ImuConfig,
    pub tof: TofConfig,
    pub edge: EdgeSensorConfig,
    pub mapping: MappingSchedule,

    // --- Core component settings, passed straight through ---
    pub map: MapConfig,
    pub range: RangeConfig,
    pub calibration: CalibrationConfig,
    pub stuck: StuckConfig,
}

// =========================================================================
// == Configuration Sub-Structs ==
// These map directly to the sections in a scenario.toml file.
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSettings {
    /// Optional seed for the pseudo-random number generator for determinism.
    pub seed: Option<u64>,
    /// Simulated duration of the run in seconds (calibration not included).
    pub duration_s: f64,
    /// Fixed control-loop period in seconds.
    pub dt_s: f64,
    /// How often the pose estimate is logged, in seconds.
    pub log_interval_s: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            seed: None,
            duration_s: 60.0,
            dt_s: 0.02,
            log_interval_s: 1.0,
        }
    }
}

/// An axis-aligned box obstacle inside the room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoxObstacle {
    /// Centre (x, y) in room coordinates, meters.
    pub center: [f64; 2],
    /// Full (width, height) in meters.
    pub size: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Room extent along x, meters. The room spans `[0, width_m]`.
    pub width_m: f64,
    /// Room extent along y, meters. The room spans `[0, height_m]`.
    pub height_m: f64,
    pub obstacles: Vec<BoxObstacle>,
    /// Areas with no floor (stairwells, table edges). Same shape as obstacles.
    pub drop_offs: Vec<BoxObstacle>,
    /// Robot start position in room coordinates.
    pub start: [f64; 2],
    /// Robot start heading, degrees counter-clockwise from room +x.
    pub start_heading_deg: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width_m: 4.0,
            height_m: 4.0,
            obstacles: Vec::new(),
            drop_offs: Vec::new(),
            start: [2.0, 2.0],
            start_heading_deg: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotConfig {
    /// Body radius used for collisions, meters.
    pub radius_m: f64,
    /// Cruise speed while wandering, m/s.
    pub forward_speed_mps: f64,
    /// Yaw rate used for in-place turns, deg/s.
    pub turn_rate_dps: f64,
    /// Time to ramp from standstill to cruise speed, seconds.
    pub ramp_time_s: f64,
    /// Length of one obstacle-avoidance turn, seconds.
    pub turn_duration_s: f64,
    /// Length of the reverse leg of a stuck recovery, seconds.
    pub reverse_duration_s: f64,
    /// A range reading closer than this (centimeters) triggers a turn.
    pub obstacle_distance_cm: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            radius_m: 0.08,
            forward_speed_mps: 0.2,
            turn_rate_dps: 120.0,
            ramp_time_s: 0.5,
            turn_duration_s: 0.3,
            reverse_duration_s: 1.0,
            obstacle_distance_cm: 20.0,
        }
    }
}

/// Noise model of the simulated 6-DOF IMU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImuConfig {
    /// Constant z-axis gyroscope offset, deg/s.
    pub gyro_bias_dps: f64,
    /// Per-axis gyroscope white noise std-dev, deg/s.
    pub gyro_noise_stddev_dps: f64,
    /// Per-axis accelerometer white noise std-dev, m/s^2.
    pub accel_noise_stddev_mps2: f64,
    /// Probability that any single read fails.
    pub failure_probability: f64,
}

impl Default for ImuConfig {
    fn default() -> Self {
        Self {
            gyro_bias_dps: 0.8,
            gyro_noise_stddev_dps: 0.05,
            accel_noise_stddev_mps2: 0.02,
            failure_probability: 0.0,
        }
    }
}

/// The simulated time-of-flight ranger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TofConfig {
    /// Beyond this the sensor reports no return, meters.
    pub max_range_m: f64,
    /// Range noise std-dev, centimeters.
    pub noise_stddev_cm: f64,
}

impl Default for TofConfig {
    fn default() -> Self {
        Self {
            max_range_m: 2.0,
            noise_stddev_cm: 0.5,
        }
    }
}

/// Placement of the two downward-facing edge sensors in the robot frame.
/// The left sensor sits at `(+forward, +lateral)`, the right one mirrors it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EdgeSensorConfig {
    /// Distance ahead of the robot centre, meters.
    pub forward_offset_m: f64,
    /// Distance either side of the centre line, meters.
    pub lateral_offset_m: f64,
}

impl Default for EdgeSensorConfig {
    fn default() -> Self {
        Self {
            forward_offset_m: 0.1,
            lateral_offset_m: 0.06,
        }
    }
}

/// When the control loop touches the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingSchedule {
    /// Seconds between map updates; 0 updates every tick.
    pub update_interval_s: f64,
    /// Whether the map is rendered periodically during the run.
    pub display: bool,
    /// Seconds between renders.
    pub display_interval_s: f64,
}

impl Default for MappingSchedule {
    fn default() -> Self {
        Self {
            update_interval_s: 2.0,
            display: true,
            display_interval_s: 10.0,
        }
    }
}
