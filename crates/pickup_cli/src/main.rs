use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pickup_core::scenario::{PickupPointParams, ZoneBalancingConfig};
use pickup_core::simulation::Simulation;
use pickup_core::telemetry::RunSummary;
use pickup_experiments::{
    compare_to_baseline, export_comparison, export_customers_to_json, export_to_csv,
    export_to_json, load_comparison, replicate, run_parallel_experiments, standard_scenarios,
    BaselineComparison, ScenarioComparison,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "pickup",
    about = "Discrete-event simulation of a parcel pickup point",
    long_about = "Simulates a pickup point with staff counters, self-service terminals,\n\
                  customer balking and optional zone load balancing, and compares\n\
                  operating policies over many replications."
)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scenario and print its summary
    Run(RunArgs),
    /// Run the three standard policies over many replications
    Compare(CompareArgs),
    /// Test a persisted comparison file against its baseline
    Analyze {
        /// Comparison JSON written by `compare --output`
        path: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Staff counters
    #[arg(long, default_value_t = 3)]
    staff: u32,
    /// Self-service terminals
    #[arg(long, default_value_t = 2)]
    terminals: u32,
    /// Number of equally efficient zones for staff load balancing (0 disables it)
    #[arg(long, default_value_t = 0)]
    zones: usize,
    /// Arrivals per minute
    #[arg(long, default_value_t = 1.0)]
    rate: f64,
    /// Simulated minutes
    #[arg(long, default_value_t = 120.0)]
    horizon: f64,
    #[arg(long, env = "PICKUP_SEED")]
    seed: Option<u64>,
    /// Write every customer record to this JSON file
    #[arg(long)]
    customers: Option<PathBuf>,
}

#[derive(Args)]
struct CompareArgs {
    #[arg(long, default_value_t = 30)]
    replications: usize,
    /// Seed of replication 0; replication r uses base_seed + r in every scenario
    #[arg(long, default_value_t = 42)]
    base_seed: u64,
    /// Worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,
    /// Arrivals per minute for every scenario
    #[arg(long)]
    rate: Option<f64>,
    /// Comparison JSON read by `analyze`
    #[arg(long, default_value = "scenario_comparison.json")]
    output: PathBuf,
    /// Per-replication results as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Per-replication results as JSON
    #[arg(long)]
    results_json: Option<PathBuf>,
}

// ── helpers ────────────────────────────────────────────────────────

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_summary(summary: &RunSummary) {
    println!("Horizon:                 {:.0} min", summary.horizon);
    println!("Customers arrived:       {}", summary.total_customers);
    println!("  served:                {}", summary.customers_served);
    println!("  in service at end:     {}", summary.customers_in_service);
    println!("  waiting at end:        {}", summary.customers_waiting);
    println!("  balked:                {}", summary.balked_customers);
    println!("Average waiting time:    {:.2} min", summary.avg_waiting_time);
    println!("Maximum waiting time:    {:.2} min", summary.max_waiting_time);
    println!("Staff utilization:       {:.1}%", summary.staff_utilization * 100.0);
    println!(
        "Self-service utilization: {:.1}%",
        summary.self_service_utilization * 100.0
    );
    println!(
        "Average line length:     staff {:.2}, self-service {:.2}",
        summary.avg_staff_queue_length, summary.avg_self_service_queue_length
    );
}

fn print_comparison(comparison: &ScenarioComparison) {
    println!("{:<16} {:>14} {:>10}", "scenario", "mean wait", "balk share");
    for (index, name) in comparison.scenarios.iter().enumerate() {
        let wait = comparison
            .mean_waiting_time(index)
            .map_or_else(|| "-".to_string(), |w| format!("{w:.2} min"));
        let balk = comparison
            .balk_share(index)
            .map_or_else(|| "-".to_string(), |s| format!("{:.1}%", s * 100.0));
        println!("{name:<16} {wait:>14} {balk:>10}");
    }
}

fn print_test_row(row: &BaselineComparison) {
    println!("\n{} vs baseline", row.scenario);
    match row.waiting_time {
        Some(t) => println!(
            "  waiting time: t = {:.3}, df = {:.1}, p = {:.4}{}",
            t.statistic,
            t.degrees_of_freedom,
            t.p_value,
            if row.waiting_time_differs() { " (significant)" } else { "" }
        ),
        None => println!("  waiting time: not enough variation to test"),
    }
    match row.balking {
        Some(z) => println!(
            "  balking:      z = {:.3}, p = {:.4}{}",
            z.statistic,
            z.p_value,
            if row.balking_differs() { " (significant)" } else { "" }
        ),
        None => println!("  balking:      not enough observations to test"),
    }
}

// ── commands ───────────────────────────────────────────────────────

fn run(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let mut params = PickupPointParams::default()
        .with_staff(args.staff)
        .with_self_service(args.terminals)
        .with_arrival_rate(args.rate)
        .with_horizon_minutes(args.horizon);
    if args.zones > 0 {
        params = params.with_zone_balancing(ZoneBalancingConfig::uniform(args.zones, 1.0));
    }
    if let Some(seed) = args.seed {
        params = params.with_seed(seed);
    }

    let mut sim = Simulation::new(params)?;
    sim.run();
    print_summary(&sim.summary());

    if let Some(path) = args.customers {
        export_customers_to_json(&sim.customers(), &path)?;
        info!(path = %path.display(), "customer records written");
    }
    Ok(())
}

fn compare(args: CompareArgs) -> Result<(), Box<dyn Error>> {
    let scenarios: Vec<_> = standard_scenarios()
        .into_iter()
        .map(|scenario| match args.rate {
            Some(rate) => scenario.map_params(|p| p.with_arrival_rate(rate)),
            None => scenario,
        })
        .collect();
    let sets = replicate(&scenarios, args.replications, args.base_seed);
    let results = run_parallel_experiments(sets.clone(), args.threads)?;

    let comparison = ScenarioComparison::from_results(&results);
    print_comparison(&comparison);

    export_comparison(&comparison, &args.output)?;
    info!(path = %args.output.display(), "comparison written");
    if let Some(path) = args.csv {
        export_to_csv(&results, &sets, &path)?;
        info!(path = %path.display(), "results CSV written");
    }
    if let Some(path) = args.results_json {
        export_to_json(&results, &path)?;
        info!(path = %path.display(), "results JSON written");
    }
    Ok(())
}

fn analyze(path: PathBuf) -> Result<(), Box<dyn Error>> {
    let comparison = load_comparison(&path)?;
    print_comparison(&comparison);
    for row in compare_to_baseline(&comparison) {
        print_test_row(&row);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Compare(args) => compare(args),
        Commands::Analyze { path } => analyze(path),
    }
}
