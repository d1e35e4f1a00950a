// gismo_core/src/behavior/stuck.rs

use log::{info, warn};
use nalgebra::Vector2;

use crate::config::StuckConfig;

/// Outcome of one [`StuckDetector::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StuckVerdict {
    /// Not evaluated this time: motors idle, or too soon since the last
    /// recorded movement.
    NotChecked,
    /// The estimate moved far enough; the stuck counter was reset.
    Moving,
    /// No progress. The caller should run a recovery manoeuvre and then call
    /// [`StuckDetector::mark_moved`].
    Stuck { count: u32 },
    /// `stuck_threshold` consecutive stuck verdicts. The counter has been
    /// reset; the caller should stop wandering.
    GaveUp,
}

/// Detects a robot whose motors are driving but whose estimated position is
/// not changing.
#[derive(Debug, Clone)]
pub struct StuckDetector {
    config: StuckConfig,
    last_position: Vector2<f64>,
    time_last_moved: f64,
    stuck_count: u32,
}

impl StuckDetector {
    pub fn new(config: StuckConfig, position: Vector2<f64>, now: f64) -> Self {
        Self {
            config,
            last_position: position,
            time_last_moved: now,
            stuck_count: 0,
        }
    }

    /// Records that the robot was commanded to (and presumably did) move.
    pub fn mark_moved(&mut self, now: f64) {
        self.time_last_moved = now;
    }

    pub fn stuck_count(&self) -> u32 {
        self.stuck_count
    }

    pub fn check(&mut self, position: Vector2<f64>, now: f64, motors_commanded: bool) -> StuckVerdict {
        if !motors_commanded || now - self.time_last_moved <= self.config.stuck_time_s {
            return StuckVerdict::NotChecked;
        }

        let moved = (position - self.last_position).norm();
        self.last_position = position;

        if moved >= self.config.stuck_distance_m {
            self.stuck_count = 0;
            return StuckVerdict::Moving;
        }

        self.stuck_count += 1;
        if self.stuck_count >= self.config.stuck_threshold {
            warn!("Stuck {} times in a row, giving up", self.stuck_count);
            self.stuck_count = 0;
            StuckVerdict::GaveUp
        } else {
            info!("Stuck detected ({} of {})", self.stuck_count, self.config.stuck_threshold);
            StuckVerdict::Stuck {
                count: self.stuck_count,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> StuckDetector {
        StuckDetector::new(StuckConfig::default(), Vector2::zeros(), 0.0)
    }

    #[test]
    fn idle_motors_are_never_stuck() {
        let mut d = detector();
        assert_eq!(d.check(Vector2::zeros(), 60.0, false), StuckVerdict::NotChecked);
    }

    #[test]
    fn waits_for_stuck_time() {
        let mut d = detector();
        assert_eq!(d.check(Vector2::zeros(), 4.0, true), StuckVerdict::NotChecked);
        assert_eq!(d.check(Vector2::zeros(), 5.5, true), StuckVerdict::Stuck { count: 1 });
    }

    #[test]
    fn gives_up_after_threshold_and_resets() {
        let mut d = detector();
        assert_eq!(d.check(Vector2::zeros(), 6.0, true), StuckVerdict::Stuck { count: 1 });
        assert_eq!(d.check(Vector2::zeros(), 7.0, true), StuckVerdict::Stuck { count: 2 });
        assert_eq!(d.check(Vector2::zeros(), 8.0, true), StuckVerdict::GaveUp);
        assert_eq!(d.stuck_count(), 0);
    }

    #[test]
    fn progress_resets_the_counter() {
        let mut d = detector();
        d.check(Vector2::zeros(), 6.0, true);
        assert_eq!(d.stuck_count(), 1);
        assert_eq!(d.check(Vector2::new(0.1, 0.0), 7.0, true), StuckVerdict::Moving);
        assert_eq!(d.stuck_count(), 0);
    }

    #[test]
    fn recovery_restarts_the_timer() {
        let mut d = detector();
        assert!(matches!(d.check(Vector2::zeros(), 6.0, true), StuckVerdict::Stuck { .. }));
        d.mark_moved(6.0);
        assert_eq!(d.check(Vector2::zeros(), 9.0, true), StuckVerdict::NotChecked);
    }
}
