// gismo_sim/src/simulation/vehicle.rs

//! Ground-truth kinematics of Gismo's two-wheel differential drive.

use log::debug;
use nalgebra::Vector2;

use crate::simulation::config::RobotConfig;
use crate::simulation::core::ground_truth::{GroundTruthState, TruthFeed};
use crate::simulation::world::World;

/// What the motors are asked to do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveCommand {
    /// Target forward speed, m/s (negative reverses).
    pub speed: f64,
    /// Yaw rate, deg/s, counter-clockwise positive.
    pub yaw_rate_dps: f64,
}

impl DriveCommand {
    pub const STOP: DriveCommand = DriveCommand {
        speed: 0.0,
        yaw_rate_dps: 0.0,
    };

    pub fn forward(speed: f64) -> Self {
        Self {
            speed,
            yaw_rate_dps: 0.0,
        }
    }

    pub fn reverse(speed: f64) -> Self {
        Self::forward(-speed)
    }

    /// In-place turn; `left` is counter-clockwise.
    pub fn turn(rate_dps: f64, left: bool) -> Self {
        Self {
            speed: 0.0,
            yaw_rate_dps: if left { rate_dps } else { -rate_dps },
        }
    }

    pub fn is_moving(&self) -> bool {
        self.speed != 0.0 || self.yaw_rate_dps != 0.0
    }
}

/// A unicycle-model robot. Speed ramps toward the command at a fixed rate;
/// yaw rate follows the command at once. A step that would put the body
/// inside a wall or obstacle is refused and the robot stalls in place.
#[derive(Debug, Clone)]
pub struct DiffDriveRobot {
    config: RobotConfig,
    state: GroundTruthState,
    command: DriveCommand,
    feed: TruthFeed,
}

impl DiffDriveRobot {
    pub fn new(config: RobotConfig, start: GroundTruthState, feed: TruthFeed) -> Self {
        feed.set(start);
        Self {
            config,
            state: start,
            command: DriveCommand::STOP,
            feed,
        }
    }

    pub fn set_command(&mut self, command: DriveCommand) {
        self.command = command;
    }

    pub fn command(&self) -> DriveCommand {
        self.command
    }

    pub fn state(&self) -> &GroundTruthState {
        &self.state
    }

    pub fn is_stalled(&self) -> bool {
        self.state.stalled
    }

    pub fn step(&mut self, world: &World, dt: f64) {
        let previous_speed = self.state.speed;

        let max_delta = if self.config.ramp_time_s > 0.0 {
            self.config.forward_speed_mps / self.config.ramp_time_s * dt
        } else {
            f64::INFINITY
        };
        let mut speed =
            previous_speed + (self.command.speed - previous_speed).clamp(-max_delta, max_delta);

        let yaw_rate = self.command.yaw_rate_dps.to_radians();
        let heading = self.state.heading + yaw_rate * dt;
        let candidate = self.state.position + Vector2::new(heading.cos(), heading.sin()) * speed * dt;

        let stalled = !world.is_free(&candidate, self.config.radius_m);
        if stalled {
            if !self.state.stalled {
                debug!(
                    "Robot blocked at ({:.2}, {:.2})",
                    self.state.position.x, self.state.position.y
                );
            }
            speed = 0.0;
        } else {
            self.state.position = candidate;
        }

        self.state.heading = heading;
        self.state.speed = speed;
        self.state.yaw_rate = yaw_rate;
        self.state.body_accel = Vector2::new((speed - previous_speed) / dt, speed * yaw_rate);
        self.state.stalled = stalled;

        self.feed.set(self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn robot_at(x: f64, y: f64, feed: TruthFeed) -> DiffDriveRobot {
        DiffDriveRobot::new(
            RobotConfig::default(),
            GroundTruthState::at(Vector2::new(x, y), 0.0),
            feed,
        )
    }

    #[test]
    fn speed_ramps_to_command() {
        let world = World::new(10.0, 10.0, vec![]);
        let feed = TruthFeed::default();
        let mut robot = robot_at(1.0, 5.0, feed.clone());
        robot.set_command(DriveCommand::forward(0.2));

        robot.step(&world, 0.1);
        // 0.2 m/s over a 0.5 s ramp: 0.04 m/s per 0.1 s.
        assert_abs_diff_eq!(robot.state().speed, 0.04, epsilon = 1e-12);
        assert_abs_diff_eq!(feed.get().body_accel.x, 0.4, epsilon = 1e-9);

        for _ in 0..20 {
            robot.step(&world, 0.1);
        }
        assert_abs_diff_eq!(robot.state().speed, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(feed.get().body_accel.x, 0.0, epsilon = 1e-9);
        assert!(robot.state().position.x > 1.3);
    }

    #[test]
    fn turning_in_place_keeps_position() {
        let world = World::new(10.0, 10.0, vec![]);
        let mut robot = robot_at(5.0, 5.0, TruthFeed::default());
        robot.set_command(DriveCommand::turn(90.0, true));
        for _ in 0..10 {
            robot.step(&world, 0.1);
        }
        assert_abs_diff_eq!(robot.state().heading.to_degrees(), 90.0, epsilon = 1e-9);
        assert_eq!(robot.state().position, Vector2::new(5.0, 5.0));
    }

    #[test]
    fn walls_stall_the_robot() {
        let world = World::new(1.0, 1.0, vec![]);
        let mut robot = robot_at(0.8, 0.5, TruthFeed::default());
        robot.set_command(DriveCommand::forward(0.2));
        for _ in 0..100 {
            robot.step(&world, 0.05);
        }
        assert!(robot.is_stalled());
        assert_eq!(robot.state().speed, 0.0);
        assert!(robot.state().position.x + RobotConfig::default().radius_m <= 1.0);
    }
}
