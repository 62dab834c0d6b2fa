use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use super::job::Job;
use crate::algorithms::AlgoArgs;
use crate::benchmarks::BenchmarkRegistry;
use crate::error::{ExperimentError, Result, ResultExt};

/// One entry of the job batch file, before benchmark resolution.
///
/// ```json
/// {
///   "jobs": [
///     {
///       "algorithm": "DEGA",
///       "algo_args": { "lamb": 2 },
///       "benchmark": "LO",
///       "n": 100,
///       "reps": 20,
///       "description": "dega(n=100)",
///       "max_evals": 30000,
///       "budget_description": "30*n*log(n)"
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct JobSpec {
    pub algorithm: String,
    #[serde(default)]
    pub algo_args: AlgoArgs,
    pub benchmark: String,
    pub n: usize,
    #[serde(default = "default_reps")]
    pub reps: usize,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub max_evals: Option<u64>,
    #[serde(default)]
    pub budget_description: Option<String>,
}

fn default_reps() -> usize {
    1
}

#[derive(Debug, Deserialize)]
struct JobsFile {
    #[serde(default)]
    jobs: Vec<JobSpec>,
}

/// Loads a JSON batch file and resolves every entry against the benchmark
/// registry.
///
/// # Errors
///
/// Fails the whole load on an unreadable file, malformed JSON or an entry
/// referencing an unknown benchmark key.
pub fn load_jobs(path: &Path, benchmarks: &BenchmarkRegistry) -> Result<Vec<Job>> {
    let file = File::open(path).context(format!(
        "Failed to open job batch file '{}'",
        path.display()
    ))?;
    let parsed: JobsFile = serde_json::from_reader(BufReader::new(file))?;

    parsed
        .jobs
        .into_iter()
        .map(|spec| resolve_job(spec, benchmarks))
        .collect()
}

/// Resolves a spec into a runnable job: looks up the benchmark, fixes the
/// optimum for the given `n` and derives the default evaluation budget
/// when the spec does not set one.
pub fn resolve_job(spec: JobSpec, benchmarks: &BenchmarkRegistry) -> Result<Job> {
    if spec.n == 0 {
        return Err(ExperimentError::Configuration(format!(
            "job '{}': n must be at least 1",
            spec.description
        )));
    }

    let benchmark = benchmarks.get(&spec.benchmark)?;

    let (max_evals, budget_description) = match spec.max_evals {
        Some(explicit) => (explicit, spec.budget_description),
        None => (benchmark.default_budget(spec.n), None),
    };

    Ok(Job {
        algorithm: spec.algorithm,
        algo_args: spec.algo_args,
        benchmark_name: benchmark.name.clone(),
        n: spec.n,
        reps: spec.reps,
        max_evals,
        description: spec.description,
        budget_description,
        optimum: benchmark.optimum(spec.n),
        problem: Arc::clone(&benchmark.problem),
    })
}
