// fusion_sim/src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fusion-sim: replay or simulate lidar/radar observations through the CTRV UKF.
///
/// This struct defines the command-line arguments accepted by the
/// `fusion-sim` binary.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML file overriding the default filter and scenario configuration.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log every estimate (DEBUG level).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Print the effective configuration as TOML before running.
    #[arg(long, global = true, default_value_t = false)]
    pub print_config: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the filter over a dataset file, or every `*.txt` file under a directory.
    Replay {
        /// Dataset file or directory.
        path: PathBuf,
    },
    /// Generate seeded CTRV scenarios and run the filter over each of them.
    Simulate {
        /// Override `scenario.runs`.
        #[arg(long)]
        runs: Option<usize>,
        /// Override `scenario.seed`.
        #[arg(long)]
        seed: Option<u64>,
    },
}
