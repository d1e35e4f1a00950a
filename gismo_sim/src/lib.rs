// gismo_sim/src/lib.rs

// This prelude is for convenience for other files WITHIN the gismo_sim crate
// and for the binary.
pub mod prelude;

pub mod cli;
pub mod error;
// This module contains all the simulation-specific logic.
pub mod simulation;
