// gismo_core/src/lib.rs

// This file defines the public modules of the library.
pub mod behavior;
pub mod clock;
pub mod config;
pub mod error;
pub mod estimation;
pub mod mapping;
pub mod prelude;
pub mod sensors;
pub mod types;
pub mod utils;
