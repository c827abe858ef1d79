use std::process::{exit, Command};

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the pickup point simulation workspace"
)]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Run the three standard policies once each (seed 42)
    Run,
    /// Run the replicated policy comparison, then analyze the written file
    Study {
        #[arg(long, default_value_t = 30)]
        replications: usize,
        #[arg(long, default_value = "scenario_comparison.json")]
        output: String,
    },
    /// Criterion benchmarks for full runs and zone assignment
    Bench,
    /// Pre-merge checks
    Ci {
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, Copy, PartialEq, ValueEnum)]
enum CiJob {
    /// fmt, clippy and the test suites
    Check,
    /// Everything in `check`, plus the example scenario and benchmarks
    All,
}

const EXAMPLE: &[&str] = &["run", "-p", "pickup_core", "--example", "scenario_run", "--release"];
const BENCH: &[&str] = &["bench", "-p", "pickup_core", "--bench", "performance"];

/// Run `cargo <args>` and exit with its status on failure.
fn cargo(label: &str, args: &[&str]) {
    eprintln!("\n=== {label} ===\n+ cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo");
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn ci(job: CiJob) {
    cargo("Format", &["fmt", "--all", "--", "--check"]);
    cargo(
        "Clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    );
    for crate_name in ["pickup_core", "pickup_experiments"] {
        cargo(&format!("Test {crate_name}"), &["test", "-p", crate_name]);
    }
    if job == CiJob::All {
        cargo("Example scenario", EXAMPLE);
        cargo("Benchmarks", BENCH);
    }
    eprintln!("\nCI job passed.");
}

fn main() {
    match Cli::parse().command {
        Task::Run => cargo("Standard policies", EXAMPLE),
        Task::Study {
            replications,
            output,
        } => {
            let replications = replications.to_string();
            let cli = ["run", "-p", "pickup_cli", "--release", "--"];
            let mut compare = cli.to_vec();
            compare.extend(["compare", "--replications", replications.as_str(), "--output", output.as_str()]);
            cargo("Replicated comparison", &compare);
            let mut analyze = cli.to_vec();
            analyze.extend(["analyze", output.as_str()]);
            cargo("Significance tests", &analyze);
        }
        Task::Bench => cargo("Benchmarks", BENCH),
        Task::Ci { job } => ci(job),
    }
}
