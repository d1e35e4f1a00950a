// gismo_sim/src/main.rs

use clap::Parser;
use gismo_sim::prelude::*;
use log::info;

fn main() -> Result<(), SimError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();
    let mut config = load_scenario(&args.scenario)?;

    // --- Command-line overrides ---
    if let Some(duration) = args.duration {
        config.simulation.duration_s = duration;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }
    if args.no_display {
        config.mapping.display = false;
    }
    config.validate()?;

    if args.print_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let mut sim = build_simulation(&config)?;
    let summary = sim.run(|map| println!("{map}"));

    info!(
        "Finished after {:.1} s: {} map updates, {} ignored readings, {} obstacle turns, {} edge turns, {} stuck events{}",
        summary.sim_time_s,
        summary.map_updates_applied,
        summary.readings_ignored,
        summary.obstacle_reactions,
        summary.edge_reactions,
        summary.stuck_events,
        if summary.gave_up { " (gave up)" } else { "" }
    );
    info!(
        "Estimate ({:.2}, {:.2}) @ {:.1} deg, truth ({:.2}, {:.2}) @ {:.1} deg, error {:.2} m",
        summary.final_estimate.position.x,
        summary.final_estimate.position.y,
        summary.final_estimate.heading,
        summary.final_truth.position.x,
        summary.final_truth.position.y,
        summary.final_truth.heading,
        summary.position_error()
    );
    info!(
        "Map: {} occupied, {} free, {} unknown cells",
        summary.stats.occupied, summary.stats.free, summary.stats.unknown
    );

    let final_pose = sim.estimator().pose();
    println!("{}", sim.mapper().render(Some(&final_pose.position)));
    Ok(())
}
