//! Scenario experiments for the pickup point simulation.
//!
//! Runs the standard policies (and arbitrary parameter grids) over many replications
//! in parallel, extracts per-run metrics, persists them and tests whether the
//! alternative policies differ significantly from the baseline.
//!
//! # Quick Start
//!
//! ```no_run
//! use pickup_experiments::{
//!     compare_to_baseline, replicate, run_parallel_experiments, standard_scenarios,
//!     ScenarioComparison,
//! };
//!
//! let sets = replicate(&standard_scenarios(), 30, 42);
//! let results = run_parallel_experiments(sets, None).unwrap();
//! let comparison = ScenarioComparison::from_results(&results);
//! for row in compare_to_baseline(&comparison) {
//!     println!("{}: waiting time differs = {}", row.scenario, row.waiting_time_differs());
//! }
//! ```
//!
//! # Architecture
//!
//! - [`scenarios`]: the baseline / self-service / zone-balancing policies
//! - [`parameters`]: grid search over capacities, arrival rates and zone balancing
//! - [`runner`]: parallel simulation execution using rayon
//! - [`metrics`]: metrics extraction from one finished run
//! - [`export`]: JSON/CSV results and the persisted scenario comparison
//! - [`stats`]: Welch t-test and two-proportion z-test against the baseline

pub mod error;
pub mod export;
pub mod metrics;
pub mod parameters;
pub mod runner;
pub mod scenarios;
pub mod stats;

pub use error::ExperimentError;
pub use export::{
    export_comparison, export_customers_to_json, export_to_csv, export_to_json, load_comparison,
    ScenarioComparison,
};
pub use metrics::SimulationResult;
pub use parameters::{ParameterSet, ParameterSpace};
pub use runner::{run_parallel_experiments, run_parallel_experiments_with_progress, run_single_simulation};
pub use scenarios::{replicate, standard_scenarios, Scenario};
pub use stats::{compare_to_baseline, two_proportion_z_test, welch_t_test, BaselineComparison};
