// fusion_sim/src/lib.rs

use fusion_core::estimation::filters::UnscentedKalmanFilter;
use std::path::Path;
use tracing::info;

use crate::cli::{Cli, Command};
use crate::simulation::core::config::{load_config, SimulationConfig};
use crate::simulation::core::prng::SimulationRng;
use crate::simulation::dataset::{collect_dataset_files, read_file};
use crate::simulation::error::SimError;
use crate::simulation::runner::{run, Evaluation};
use crate::simulation::scenario;

// This prelude is for convenience for other files WITHIN the fusion_sim crate.
pub mod prelude;

pub mod cli;
pub mod simulation;

/// Loads the configuration named on the command line and runs the requested command.
pub fn execute(cli: &Cli) -> Result<(), SimError> {
    let mut config = load_config(cli.config.as_deref())?;

    if let Command::Simulate { runs, seed } = &cli.command {
        if let Some(runs) = runs {
            config.scenario.runs = *runs;
        }
        if let Some(seed) = seed {
            config.scenario.seed = *seed;
        }
    }

    if cli.print_config {
        println!("{}", toml::to_string_pretty(&config)?);
    }

    match &cli.command {
        Command::Replay { path } => replay(&config, path).map(|_| ()),
        Command::Simulate { .. } => simulate(&config).map(|_| ()),
    }
}

/// Runs a fresh filter over every dataset file under `path`.
pub fn replay(config: &SimulationConfig, path: &Path) -> Result<Evaluation, SimError> {
    let files = collect_dataset_files(path).map_err(|source| SimError::Dataset {
        path: path.to_path_buf(),
        source,
    })?;
    if files.is_empty() {
        return Err(SimError::NoDatasets(path.to_path_buf()));
    }

    let mut total = Evaluation::default();
    for file in &files {
        let records = read_file(file).map_err(|source| SimError::Dataset {
            path: file.clone(),
            source,
        })?;
        info!(file = %file.display(), observations = records.len(), "replaying dataset");

        let mut ukf = UnscentedKalmanFilter::new(config.filter.clone())?;
        let evaluation = run(&mut ukf, &records);
        evaluation.log_summary(&file.display().to_string());
        total.merge(&evaluation);
    }

    if files.len() > 1 {
        total.log_summary("all files");
    }
    Ok(total)
}

/// Runs `scenario.runs` independent simulated scenarios from one seeded generator.
pub fn simulate(config: &SimulationConfig) -> Result<Evaluation, SimError> {
    let mut rng = SimulationRng::from_seed(config.scenario.seed);
    info!(
        seed = config.scenario.seed,
        runs = config.scenario.runs,
        steps = config.scenario.steps,
        "starting simulation"
    );

    let mut total = Evaluation::default();
    for index in 0..config.scenario.runs {
        let records = scenario::generate(&config.scenario, &config.filter, &mut rng)?;
        let mut ukf = UnscentedKalmanFilter::new(config.filter.clone())?;
        let evaluation = run(&mut ukf, &records);
        evaluation.log_summary(&format!("run {index}"));
        total.merge(&evaluation);
    }

    total.log_summary("all runs");
    Ok(total)
}
