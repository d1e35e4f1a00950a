// gismo_sim/src/prelude.rs

// Re-export the entire gismo_core prelude so you can easily access
// pure types like `Pose2`, `OccupancyGrid`, `PoseEstimator`, etc.
pub use gismo_core::prelude::*;

// Re-export common simulation-specific types for easy access.
pub use crate::cli::Cli;
pub use crate::error::SimError;
pub use crate::simulation::config::structs::*;
pub use crate::simulation::config::{load_scenario, parse_scenario};
pub use crate::simulation::control_loop::{ControlLoop, LoopParts, MotionState, RunSummary};
pub use crate::simulation::core::simulation_setup::{build_simulation, GismoLoop};
pub use crate::simulation::world::World;
