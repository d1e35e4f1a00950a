use clap::Parser;
use std::path::PathBuf;

/// Gismo: a headless simulator for the Gismo wandering robot.
///
/// Runs the dead-reckoning estimator and the occupancy mapper against a
/// simulated room, IMU and time-of-flight sensor.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/gismo_room.toml")]
    pub scenario: PathBuf,

    /// Override the simulated run length in seconds.
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Override the random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Do not print the map during the run (the final map is still printed).
    #[arg(long, default_value_t = false)]
    pub no_display: bool,

    /// Print the fully resolved scenario as TOML and exit.
    #[arg(long, default_value_t = false)]
    pub print_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["gismo_sim"]);
        assert_eq!(cli.scenario, PathBuf::from("assets/scenarios/gismo_room.toml"));
        assert_eq!(cli.duration, None);
        assert!(!cli.no_display);
    }

    #[test]
    fn overrides() {
        let cli = Cli::parse_from([
            "gismo_sim",
            "--scenario",
            "other.toml",
            "-d",
            "12.5",
            "--seed",
            "9",
            "--no-display",
        ]);
        assert_eq!(cli.scenario, PathBuf::from("other.toml"));
        assert_eq!(cli.duration, Some(12.5));
        assert_eq!(cli.seed, Some(9));
        assert!(cli.no_display);
    }
}
