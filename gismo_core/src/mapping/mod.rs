// gismo_core/src/mapping/mod.rs

use nalgebra::Vector2;

use crate::types::Pose2;

// --- The Mapper Trait ("Contract") ---
/// The contract for any algorithm that performs the "Mapper" role.
/// Its job is to fold range readings taken at a pose into a map and to
/// render that map for a human.
pub trait Mapper: Send {
    /// Folds one range reading (centimeters, `None` for no return) taken
    /// along the pose's heading.
    fn integrate(&mut self, pose: &Pose2, distance_cm: Option<f64>) -> MapUpdate;

    /// Renders the current map, marking the robot if a position is given.
    fn render(&self, robot_position: Option<&Vector2<f64>>) -> String;

    fn stats(&self) -> OccupancyStats;
}

mod occupancy_grid;
pub mod raycast;
pub mod render;
mod shared;

pub use occupancy_grid::{
    CellState, IgnoredReading, MapUpdate, OccupancyGrid, OccupancyStats, UNKNOWN,
};
pub use raycast::{bresenham_line, Bresenham};
pub use shared::SharedOccupancyGrid;

impl Mapper for OccupancyGrid {
    fn integrate(&mut self, pose: &Pose2, distance_cm: Option<f64>) -> MapUpdate {
        self.update_map(pose.position, distance_cm, pose.heading)
    }

    fn render(&self, robot_position: Option<&Vector2<f64>>) -> String {
        self.display_map(robot_position)
    }

    fn stats(&self) -> OccupancyStats {
        OccupancyGrid::stats(self)
    }
}

impl Mapper for SharedOccupancyGrid {
    fn integrate(&mut self, pose: &Pose2, distance_cm: Option<f64>) -> MapUpdate {
        self.update_map(pose.position, distance_cm, pose.heading)
    }

    fn render(&self, robot_position: Option<&Vector2<f64>>) -> String {
        self.display_map(robot_position)
    }

    fn stats(&self) -> OccupancyStats {
        SharedOccupancyGrid::stats(self)
    }
}
