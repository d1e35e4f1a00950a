// gismo_core/src/clock.rs

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A monotonic time source, in seconds.
///
/// The estimator only ever looks at differences between two readings, so the
/// epoch is arbitrary.
pub trait Clock: Send + Sync {
    /// Current monotonic time in seconds.
    fn now(&self) -> f64;

    /// Blocks (or, for virtual clocks, advances time) for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Wall-clock implementation backed by `std::time::Instant`.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A virtual clock that only moves when told to.
///
/// Clones share the same underlying time, so a simulation loop can hold one
/// handle and advance it while the estimator reads another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    // f64 seconds stored as raw bits.
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(start.to_bits())),
        }
    }

    pub fn set(&self, t: f64) {
        self.bits.store(t.to_bits(), Ordering::SeqCst);
    }

    pub fn advance(&self, dt: f64) {
        let t = self.now() + dt;
        self.set(t);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(1.0);
        let handle = clock.clone();
        handle.advance(0.25);
        clock.sleep(Duration::from_millis(250));
        assert_abs_diff_eq!(clock.now(), 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(handle.now(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
