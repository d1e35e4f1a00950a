// gismo_sim/tests/scenario.rs

use std::path::PathBuf;

use gismo_core::mapping::UNKNOWN;
use gismo_sim::prelude::*;

fn room_scenario() -> ScenarioConfig {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../assets/scenarios/gismo_room.toml");
    let mut config = load_scenario(&path).unwrap();
    config.mapping.display = false;
    config
}

#[test]
fn shipped_scenario_wanders_and_maps() {
    let mut config = room_scenario();
    config.simulation.duration_s = 20.0;
    // Long enough to see the far wall from the start.
    config.tof.max_range_m = 3.5;

    let mut sim = build_simulation(&config).unwrap();
    let summary = sim.run(|_| {});

    assert_eq!(summary.ticks, 1000);
    assert!((summary.sim_time_s - 20.0).abs() < 1e-6);
    assert!(summary.map_updates_applied > 0);
    assert!(summary.map_updates_applied + summary.readings_ignored >= 90);
    assert_eq!(summary.sensor_faults, 0);
    assert!(sim.mapper().with(|grid| grid.cells().iter().any(|&p| p != UNKNOWN)));

    // The truth never leaves the room.
    let truth = sim.robot().state().position;
    assert!(truth.x > 0.0 && truth.x < 4.0 && truth.y > 0.0 && truth.y < 4.0);
}

#[test]
fn same_seed_same_run() {
    let mut config = room_scenario();
    config.simulation.duration_s = 10.0;
    config.simulation.seed = Some(77);

    let first = build_simulation(&config).unwrap().run(|_| {});
    let second = build_simulation(&config).unwrap().run(|_| {});
    assert_eq!(first, second);
}

#[test]
fn robot_pinned_against_a_wall_gives_up() {
    let mut config = room_scenario();
    config.simulation.duration_s = 40.0;
    config.world.obstacles.clear();
    config.world.start = [3.85, 2.0];
    config.world.start_heading_deg = 0.0;
    // Blind ranger: nothing makes it turn away from the wall.
    config.tof.max_range_m = 0.01;

    let mut sim = build_simulation(&config).unwrap();
    let summary = sim.run(|_| {});

    assert!(summary.gave_up);
    assert_eq!(summary.stuck_events, u64::from(config.stuck.stuck_threshold));
    assert_eq!(sim.motion_state(), MotionState::Stopped);
    assert_eq!(summary.obstacle_reactions, 0);
}

#[test]
fn edge_sensors_keep_the_robot_off_a_drop_off() {
    let mut config = room_scenario();
    config.simulation.duration_s = 20.0;
    // A stairwell across the whole room, right in front of the start.
    config.world.drop_offs.push(BoxObstacle {
        center: [2.0, 1.9],
        size: [4.0, 0.6],
    });
    // No reversing: the edge sensors only look forward.
    config.stuck.stuck_time_s = 1000.0;

    let mut sim = build_simulation(&config).unwrap();
    let summary = sim.run(|_| {});

    assert!(summary.edge_reactions >= 1);
    let truth = sim.robot().state().position;
    assert!(truth.y < 1.6, "robot ended at {truth:?}");
}

#[test]
fn final_map_renders_with_border() {
    let mut config = room_scenario();
    config.simulation.duration_s = 5.0;

    let mut sim = build_simulation(&config).unwrap();
    sim.run(|_| {});
    let text = sim.mapper().render(Some(&sim.estimator().pose().position));

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), config.map.grid_size_x + 2);
    assert_eq!(lines[0], format!(" {} ", "-".repeat(config.map.grid_size_y * 2 + 1)));
    assert!(text.contains('R'));
}
