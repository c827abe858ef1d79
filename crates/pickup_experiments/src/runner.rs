//! Parallel simulation execution using rayon.

use indicatif::{ProgressBar, ProgressStyle};
use pickup_core::profiling::EventMetrics;
use pickup_core::simulation::Simulation;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::ExperimentError;
use crate::metrics::{extract_metrics, SimulationResult};
use crate::parameters::ParameterSet;

/// Run one parameter set to the horizon and extract its metrics.
pub fn run_single_simulation(param_set: &ParameterSet) -> Result<SimulationResult, ExperimentError> {
    let mut sim = Simulation::new(param_set.scenario_params())?;
    let steps = sim.run();
    let summary = sim.summary();
    let customers = sim.customers();
    let events = sim.world().resource::<EventMetrics>().events_processed;
    debug!(
        scenario = %param_set.scenario,
        replication = param_set.replication,
        seed = param_set.seed,
        steps,
        "replication finished"
    );
    Ok(extract_metrics(param_set, &summary, &customers, events))
}

/// Run every parameter set in parallel with a progress bar. Results keep the input order.
pub fn run_parallel_experiments(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
) -> Result<Vec<SimulationResult>, ExperimentError> {
    run_parallel_experiments_with_progress(parameter_sets, num_threads, true)
}

/// Run every parameter set in parallel.
///
/// `num_threads` of `None` uses rayon's default pool size. The first failing run aborts
/// the batch with its error.
pub fn run_parallel_experiments_with_progress(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<SimulationResult>, ExperimentError> {
    let total = parameter_sets.len();
    let pb = if show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Some(bar)
    } else {
        None
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    info!(runs = total, threads = pool.current_num_threads(), "running experiments");
    let pb_clone = pb.clone();
    let results = pool.install(|| {
        parameter_sets
            .par_iter()
            .map(|param_set| {
                let result = run_single_simulation(param_set);
                if let Some(ref progress_bar) = pb_clone {
                    progress_bar.inc(1);
                }
                result
            })
            .collect::<Result<Vec<_>, _>>()
    });

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    results
}
