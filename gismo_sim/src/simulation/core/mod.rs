pub mod ground_truth;
pub mod prng;
pub mod simulation_setup;
