use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::algorithms::{AlgoArgs, RunOutcome};
use crate::benchmarks::FitnessProblem;

/// A fully resolved experiment: one algorithm configuration against one
/// benchmark instance, repeated `reps` times under a fixed evaluation
/// budget.
///
/// The benchmark's fitness problem travels with the job so that worker
/// threads need no shared lookup state; it is deliberately excluded from
/// the cache key (see [`crate::experiment::JobCache`]).
#[derive(Clone)]
pub struct Job {
    pub algorithm: String,
    pub algo_args: AlgoArgs,
    pub benchmark_name: String,
    pub n: usize,
    pub reps: usize,
    pub max_evals: u64,
    pub description: String,
    pub budget_description: Option<String>,
    pub optimum: f64,
    pub problem: Arc<dyn FitnessProblem>,
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("algorithm", &self.algorithm)
            .field("algo_args", &self.algo_args)
            .field("benchmark_name", &self.benchmark_name)
            .field("n", &self.n)
            .field("reps", &self.reps)
            .field("max_evals", &self.max_evals)
            .field("description", &self.description)
            .field("budget_description", &self.budget_description)
            .field("optimum", &self.optimum)
            .finish_non_exhaustive()
    }
}

/// Metadata persisted alongside the per-repetition results so that stored
/// experiments remain interpretable without the batch file that produced
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentMetadata {
    pub run_name: Option<String>,
    pub algorithm: String,
    pub benchmark_name: String,
    pub n: usize,
    pub reps: usize,
    pub algo_args: AlgoArgs,
    pub description: String,
    pub optimum: f64,
    pub max_evals: u64,
    pub budget_description: Option<String>,
}

/// One persisted experiment: the outcome of every repetition plus the
/// metadata describing the job that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub results: Vec<RunOutcome>,
    pub metadata: ExperimentMetadata,
}
