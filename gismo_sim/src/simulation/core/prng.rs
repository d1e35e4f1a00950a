// gismo_sim/src/simulation/core/prng.rs

use log::info;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A newtype wrapper around `ChaCha8Rng`.
/// This is the central, deterministic pseudo-random number generator for the
/// simulation. Each noisy component gets its own stream through [`fork`], so
/// adding draws in one sensor never shifts another sensor's noise.
///
/// [`fork`]: SimulationRng::fork
#[derive(Debug, Clone)]
pub struct SimulationRng(pub ChaCha8Rng);

impl SimulationRng {
    /// Seeds from `seed`, or from entropy when none is given. The seed in use
    /// is logged so an unseeded run can be replayed.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        info!("Simulation seed: {}", seed);
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Derives an independent child stream.
    pub fn fork(&mut self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0.next_u64())
    }
}
