// gismo_core/src/config.rs

//! Construction-time settings for the core components.
//!
//! Every struct deserializes from a partial table: missing keys take the
//! defaults the robot shipped with. Values are fixed once a component is
//! built; nothing here is consulted mid-run.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// =========================================================================
// == Mapping ==
// =========================================================================

/// How a world coordinate divided by the cell size becomes an integer offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexRounding {
    /// Cast toward zero. Cells just left of / below the centre collapse onto
    /// the centre column / row.
    #[default]
    Truncate,
    /// Round toward negative infinity, symmetric about the centre.
    Floor,
}

impl IndexRounding {
    pub fn apply(self, value: f64) -> i64 {
        match self {
            IndexRounding::Truncate => value.trunc() as i64,
            IndexRounding::Floor => value.floor() as i64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Number of cells along x.
    pub grid_size_x: usize,
    /// Number of cells along y.
    pub grid_size_y: usize,
    /// Edge length of one cell in meters.
    pub cell_size: f64,
    /// Probability at or above which a cell counts as occupied. The free
    /// threshold is always `1 - obstacle_threshold`.
    pub obstacle_threshold: f64,
    /// Probability added to the cell a range reading ends in.
    pub hit_increment: f64,
    /// Probability removed from each cell a range reading passes through.
    pub miss_decrement: f64,
    pub index_rounding: IndexRounding,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            grid_size_x: 50,
            grid_size_y: 50,
            cell_size: 0.1,
            obstacle_threshold: 0.8,
            hit_increment: 0.2,
            miss_decrement: 0.1,
            index_rounding: IndexRounding::Truncate,
        }
    }
}

impl MapConfig {
    pub fn free_threshold(&self) -> f64 {
        1.0 - self.obstacle_threshold
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size_x == 0 || self.grid_size_y == 0 {
            return Err(ConfigError::invalid(
                "grid_size",
                format!("{}x{} has no cells", self.grid_size_x, self.grid_size_y),
            ));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::invalid(
                "cell_size",
                format!("{} must be positive", self.cell_size),
            ));
        }
        if !(self.obstacle_threshold > 0.5 && self.obstacle_threshold <= 1.0) {
            return Err(ConfigError::invalid(
                "obstacle_threshold",
                format!("{} must lie in (0.5, 1.0]", self.obstacle_threshold),
            ));
        }
        for (field, value) in [
            ("hit_increment", self.hit_increment),
            ("miss_decrement", self.miss_decrement),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(field, format!("{value} must lie in [0, 1]")));
            }
        }
        Ok(())
    }
}

// =========================================================================
// == Dead Reckoning ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalibrationConfig {
    /// Number of stationary gyroscope samples averaged into the bias.
    pub samples: usize,
    /// Pause between two samples, in seconds.
    pub delay_s: f64,
    /// How often (in samples) calibration progress is logged.
    pub progress_every: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            samples: 500,
            delay_s: 0.01,
            progress_every: 100,
        }
    }
}

impl CalibrationConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_s.max(0.0))
    }

    /// Wall-clock time the calibration is expected to take.
    pub fn expected_duration_s(&self) -> f64 {
        self.samples as f64 * self.delay_s
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples == 0 {
            return Err(ConfigError::invalid("samples", "need at least one sample"));
        }
        if !(self.delay_s.is_finite() && self.delay_s >= 0.0) {
            return Err(ConfigError::invalid(
                "delay_s",
                format!("{} must be non-negative", self.delay_s),
            ));
        }
        Ok(())
    }
}

// =========================================================================
// == Ranging ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RangeConfig {
    /// Readings farther than this (meters) are not trusted and never touch
    /// the map.
    pub max_range_m: f64,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self { max_range_m: 4.0 }
    }
}

impl RangeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_range_m.is_finite() && self.max_range_m > 0.0) {
            return Err(ConfigError::invalid(
                "max_range_m",
                format!("{} must be positive", self.max_range_m),
            ));
        }
        Ok(())
    }
}

// =========================================================================
// == Stuck Detection ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StuckConfig {
    /// Seconds of commanded motion without recorded progress before the
    /// robot is checked for being stuck.
    pub stuck_time_s: f64,
    /// Displacement (meters) below which the robot is considered stuck.
    pub stuck_distance_m: f64,
    /// Consecutive stuck verdicts before giving up.
    pub stuck_threshold: u32,
}

impl Default for StuckConfig {
    fn default() -> Self {
        Self {
            stuck_time_s: 5.0,
            stuck_distance_m: 0.05,
            stuck_threshold: 3,
        }
    }
}

impl StuckConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stuck_threshold == 0 {
            return Err(ConfigError::invalid("stuck_threshold", "must be at least 1"));
        }
        if self.stuck_time_s < 0.0 || self.stuck_distance_m < 0.0 {
            return Err(ConfigError::invalid(
                "stuck_time_s/stuck_distance_m",
                "must be non-negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_robot_constants() {
        let map = MapConfig::default();
        assert_eq!((map.grid_size_x, map.grid_size_y), (50, 50));
        assert_eq!(map.cell_size, 0.1);
        assert_eq!(map.obstacle_threshold, 0.8);
        assert!(map.validate().is_ok());

        let cal = CalibrationConfig::default();
        assert_eq!(cal.samples, 500);
        assert!((cal.expected_duration_s() - 5.0).abs() < 1e-9);
        assert!(RangeConfig::default().validate().is_ok());
        assert!(StuckConfig::default().validate().is_ok());
    }

    #[test]
    fn free_threshold_is_coupled_to_obstacle_threshold() {
        let map = MapConfig {
            obstacle_threshold: 0.7,
            ..Default::default()
        };
        assert!((map.free_threshold() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn rejects_degenerate_settings() {
        let empty = MapConfig {
            grid_size_x: 0,
            ..Default::default()
        };
        assert!(matches!(
            empty.validate(),
            Err(ConfigError::Invalid { field: "grid_size", .. })
        ));

        let low = MapConfig {
            obstacle_threshold: 0.4,
            ..Default::default()
        };
        assert!(low.validate().is_err());

        let none = CalibrationConfig {
            samples: 0,
            ..Default::default()
        };
        assert!(none.validate().is_err());

        let blind = RangeConfig { max_range_m: 0.0 };
        assert!(blind.validate().is_err());
    }

    #[test]
    fn rounding_modes_differ_only_below_zero() {
        assert_eq!(IndexRounding::Truncate.apply(2.7), 2);
        assert_eq!(IndexRounding::Floor.apply(2.7), 2);
        assert_eq!(IndexRounding::Truncate.apply(-0.5), 0);
        assert_eq!(IndexRounding::Floor.apply(-0.5), -1);
    }
}
