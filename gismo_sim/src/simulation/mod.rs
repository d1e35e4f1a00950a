pub mod config;
pub mod control_loop;
pub mod core;
pub mod sensors;
pub mod vehicle;
pub mod world;
