// gismo_core/src/behavior/mod.rs

//! Rule-based helpers the behavior loop layers on top of the pose estimate.

pub mod stuck;

pub use stuck::{StuckDetector, StuckVerdict};
