// gismo_sim/src/simulation/control_loop.rs

//! The wander loop: drive, sense, estimate, map, repeat.

use std::sync::Arc;

use gismo_core::behavior::{StuckDetector, StuckVerdict};
use gismo_core::clock::{Clock, ManualClock};
use gismo_core::estimation::StateEstimator;
use gismo_core::mapping::{MapUpdate, Mapper, OccupancyStats};
use gismo_core::sensors::{EdgeSensor, RangeSensor};
use gismo_core::types::{EdgeReading, Pose2};
use log::{debug, info, warn};
use nalgebra::Vector2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::simulation::config::{MappingSchedule, RobotConfig, ScenarioConfig, SimulationSettings};
use crate::simulation::vehicle::{DiffDriveRobot, DriveCommand};
use crate::simulation::world::World;

/// What the robot is doing between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionState {
    Forward,
    Turning { until: f64, left: bool },
    Reversing { until: f64 },
    /// Wandering was abandoned after repeated stuck detections.
    Stopped,
}

/// Counters and final state of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    /// Simulated seconds covered by the loop (calibration excluded).
    pub sim_time_s: f64,
    pub final_estimate: Pose2,
    /// Ground truth in the estimator's frame.
    pub final_truth: Pose2,
    pub map_updates_applied: u64,
    pub readings_ignored: u64,
    pub obstacle_reactions: u64,
    /// Turns away from a drop-off seen by the edge sensors.
    pub edge_reactions: u64,
    pub stuck_events: u64,
    pub gave_up: bool,
    pub sensor_faults: u64,
    pub stats: OccupancyStats,
}

impl RunSummary {
    /// Distance between the final estimate and the truth, meters.
    pub fn position_error(&self) -> f64 {
        self.final_estimate.distance_to(&self.final_truth)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    map_updates_applied: u64,
    readings_ignored: u64,
    obstacle_reactions: u64,
    edge_reactions: u64,
    stuck_events: u64,
    gave_up: bool,
    sensor_faults: u64,
}

/// Everything a [`ControlLoop`] drives. The clock must be the one the
/// estimator and sensors were built with.
pub struct LoopParts<E, M, R> {
    pub estimator: E,
    pub mapper: M,
    pub ranger: R,
    pub edges: Box<dyn EdgeSensor>,
    pub robot: DiffDriveRobot,
    pub world: Arc<World>,
    pub clock: ManualClock,
    pub rng: ChaCha8Rng,
}

/// Fixed-step loop tying an estimator, a mapper, a range sensor and the edge
/// sensors to the simulated robot. All of them share one [`ManualClock`]; the loop is the
/// only thing that advances it.
pub struct ControlLoop<E, M, R> {
    settings: SimulationSettings,
    robot_config: RobotConfig,
    schedule: MappingSchedule,
    estimator: E,
    mapper: M,
    ranger: R,
    edges: Box<dyn EdgeSensor>,
    robot: DiffDriveRobot,
    world: Arc<World>,
    clock: ManualClock,
    rng: ChaCha8Rng,
    stuck: StuckDetector,
    state: MotionState,
    origin: (Vector2<f64>, f64),
    counters: Counters,
}

impl<E, M, R> ControlLoop<E, M, R>
where
    E: StateEstimator,
    M: Mapper,
    R: RangeSensor,
{
    pub fn new(config: &ScenarioConfig, parts: LoopParts<E, M, R>) -> Self {
        let LoopParts {
            estimator,
            mapper,
            ranger,
            edges,
            robot,
            world,
            clock,
            rng,
        } = parts;
        let start = *robot.state();
        let stuck = StuckDetector::new(config.stuck.clone(), estimator.pose().position, clock.now());
        Self {
            settings: config.simulation.clone(),
            robot_config: config.robot.clone(),
            schedule: config.mapping.clone(),
            estimator,
            mapper,
            ranger,
            edges,
            robot,
            world,
            clock,
            rng,
            stuck,
            state: MotionState::Forward,
            origin: (start.position, start.heading),
            counters: Counters::default(),
        }
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    pub fn robot(&self) -> &DiffDriveRobot {
        &self.robot
    }

    pub fn motion_state(&self) -> MotionState {
        self.state
    }

    /// Ground truth expressed in the estimator's frame.
    pub fn truth_pose(&self) -> Pose2 {
        self.robot.state().relative_to(&self.origin.0, self.origin.1)
    }

    /// Runs for the configured duration. `on_render` receives the map text
    /// every `display_interval_s` when display is enabled.
    pub fn run(&mut self, mut on_render: impl FnMut(&str)) -> RunSummary {
        let dt = self.settings.dt_s;
        let ticks = (self.settings.duration_s / dt).round() as u64;
        let start = self.clock.now();

        let mut next_map = start;
        let mut next_display = start + self.schedule.display_interval_s;
        let mut next_log = start;

        info!(
            "Wandering for {:.1} s ({} ticks of {:.3} s)",
            self.settings.duration_s, ticks, dt
        );

        for _ in 0..ticks {
            let distance_cm = self.tick(dt);
            let now = self.clock.now();
            let pose = self.estimator.pose();

            if now >= next_map {
                self.map(&pose, distance_cm);
                next_map = now + self.schedule.update_interval_s;
            }

            if self.schedule.display && now >= next_display {
                on_render(&self.mapper.render(Some(&pose.position)));
                next_display = now + self.schedule.display_interval_s;
            }

            if now >= next_log {
                info!(
                    "Position (X, Y): ({:.2}, {:.2}), Heading: {:.2} degrees",
                    pose.position.x, pose.position.y, pose.heading
                );
                next_log = now + self.settings.log_interval_s;
            }
        }

        self.summary(ticks, self.clock.now() - start)
    }

    /// One control period. Returns the range reading taken this tick.
    fn tick(&mut self, dt: f64) -> Option<f64> {
        let command = self.command_for(self.clock.now());
        self.robot.set_command(command);
        self.robot.step(&self.world, dt);
        self.clock.advance(dt);
        let now = self.clock.now();

        let distance_cm = match self.ranger.read_distance_cm() {
            Ok(d) => d,
            Err(e) => {
                warn!("Range read failed: {}", e);
                self.counters.sensor_faults += 1;
                None
            }
        };

        if let Err(e) = self.estimator.update() {
            warn!("Estimator update skipped: {}", e);
            self.counters.sensor_faults += 1;
        }

        let edges = match self.edges.read_edges() {
            Ok(reading) => reading,
            Err(e) => {
                warn!("Edge read failed: {}", e);
                self.counters.sensor_faults += 1;
                EdgeReading::default()
            }
        };

        // Drop-offs win over obstacles; the left sensor is checked first.
        if self.state == MotionState::Forward && edges.any() {
            let left = !edges.left;
            debug!(
                "{} edge detected, turning {}",
                if edges.left { "Left" } else { "Right" },
                if left { "left" } else { "right" }
            );
            self.counters.edge_reactions += 1;
            self.state = MotionState::Turning {
                until: now + self.robot_config.turn_duration_s,
                left,
            };
        }

        if let (MotionState::Forward, Some(d)) = (self.state, distance_cm) {
            if d < self.robot_config.obstacle_distance_cm {
                let left = self.rng.gen_bool(0.5);
                debug!(
                    "Obstacle at {:.1} cm, turning {}",
                    d,
                    if left { "left" } else { "right" }
                );
                self.counters.obstacle_reactions += 1;
                self.state = MotionState::Turning {
                    until: now + self.robot_config.turn_duration_s,
                    left,
                };
            }
        }

        // Manoeuvres block the behaviour loop on the robot, so only plain
        // wandering is checked.
        if self.state == MotionState::Forward {
            self.check_stuck(now, command.is_moving());
        }
        distance_cm
    }

    /// Resolves expired manoeuvres and returns the motor command for `now`.
    fn command_for(&mut self, now: f64) -> DriveCommand {
        let rc = &self.robot_config;
        match self.state {
            MotionState::Forward => DriveCommand::forward(rc.forward_speed_mps),
            MotionState::Turning { until, left } if now < until => {
                DriveCommand::turn(rc.turn_rate_dps, left)
            }
            MotionState::Turning { .. } => {
                self.state = MotionState::Forward;
                DriveCommand::forward(rc.forward_speed_mps)
            }
            MotionState::Reversing { until } if now < until => {
                DriveCommand::reverse(rc.forward_speed_mps)
            }
            MotionState::Reversing { .. } => {
                // Recovery turns last twice as long as an obstacle turn.
                let left = self.rng.gen_bool(0.5);
                self.state = MotionState::Turning {
                    until: now + 2.0 * rc.turn_duration_s,
                    left,
                };
                self.stuck.mark_moved(now);
                DriveCommand::turn(rc.turn_rate_dps, left)
            }
            MotionState::Stopped => DriveCommand::STOP,
        }
    }

    fn check_stuck(&mut self, now: f64, motors_commanded: bool) {
        let position = self.estimator.pose().position;
        match self.stuck.check(position, now, motors_commanded) {
            StuckVerdict::NotChecked => {}
            StuckVerdict::Moving => self.stuck.mark_moved(now),
            StuckVerdict::Stuck { count } => {
                debug!("Stuck ({}), reversing", count);
                self.counters.stuck_events += 1;
                self.state = MotionState::Reversing {
                    until: now + self.robot_config.reverse_duration_s,
                };
            }
            StuckVerdict::GaveUp => {
                warn!("Robot got stuck. Stopping.");
                self.counters.stuck_events += 1;
                self.counters.gave_up = true;
                self.state = MotionState::Stopped;
            }
        }
    }

    fn map(&mut self, pose: &Pose2, distance_cm: Option<f64>) {
        match self.mapper.integrate(pose, distance_cm) {
            MapUpdate::Applied { .. } => self.counters.map_updates_applied += 1,
            MapUpdate::Ignored(reason) => {
                debug!("Map update ignored: {:?}", reason);
                self.counters.readings_ignored += 1;
            }
        }
    }

    fn summary(&self, ticks: u64, sim_time_s: f64) -> RunSummary {
        let c = self.counters;
        RunSummary {
            ticks,
            sim_time_s,
            final_estimate: self.estimator.pose(),
            final_truth: self.truth_pose(),
            map_updates_applied: c.map_updates_applied,
            readings_ignored: c.readings_ignored,
            obstacle_reactions: c.obstacle_reactions,
            edge_reactions: c.edge_reactions,
            stuck_events: c.stuck_events,
            gave_up: c.gave_up,
            sensor_faults: c.sensor_faults,
            stats: self.mapper.stats(),
        }
    }
}
