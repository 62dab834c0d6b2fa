use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::error;

use degalab::algorithms::AlgorithmRegistry;
use degalab::benchmarks::BenchmarkRegistry;
use degalab::error::Result;
use degalab::experiment::{load_jobs, JobCache, Runner};

/// Parallel, cache-aware runner for evolutionary-algorithm runtime
/// experiments.
#[derive(Parser, Debug)]
#[command(name = "degalab", about = "Parallel, cache-aware runner for EA runtime experiments")]
struct Cli {
    /// Path to the JSON file listing all jobs.
    #[arg(short, long, default_value = "jobs.json")]
    config: PathBuf,

    /// Number of parallel workers (default: all cores).
    #[arg(short, long)]
    workers: Option<usize>,

    /// Force rerun of all jobs, ignoring cached results.
    #[arg(short, long)]
    force: bool,

    /// Remove all cached data for this run and exit.
    #[arg(short = 'x', long)]
    clean: bool,

    /// Optional name to namespace this batch of runs
    /// (creates data/<run-name>/...).
    #[arg(short = 'n', long)]
    run_name: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let cache = match &cli.run_name {
        Some(name) => JobCache::with_run_name("data", name.clone()),
        None => JobCache::new("data"),
    };

    if cli.clean {
        let root = cache.data_root();
        if root.exists() {
            std::fs::remove_dir_all(&root)?;
            println!("Removed {}", root.display());
        } else {
            println!("No cache found at {}", root.display());
        }
        return Ok(());
    }

    let benchmarks = BenchmarkRegistry::builtin();
    let registry = Arc::new(AlgorithmRegistry::builtin());
    let jobs = load_jobs(&cli.config, &benchmarks)?;

    let mut runner = Runner::new(cache, registry);
    if let Some(workers) = cli.workers {
        runner = runner.with_max_workers(workers);
    }
    let reports = runner.run_jobs(jobs, cli.force)?;

    println!(
        "\n{:<12} {:<6} {:<6} {:<10} {:<12} DESC",
        "ALG", "BM", "N", "MAX_E", "STATUS"
    );
    for report in &reports {
        println!(
            "{:<12} {:<6} {:<6} {:<10} {:<12} {}",
            report.job.algorithm,
            report.job.benchmark_name,
            report.job.n,
            report.job.max_evals,
            report.status.to_string(),
            report.job.description
        );
    }

    Ok(())
}
