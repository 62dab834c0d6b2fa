use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::cache::JobCache;
use super::job::{ExperimentMetadata, ExperimentResult, Job};
use crate::algorithms::AlgorithmRegistry;
use crate::error::{ExperimentError, Result};

/// Terminal status of one job within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// A valid result was already stored; the job was not executed.
    Cached,
    /// All repetitions ran and the result was persisted.
    Success,
    /// The job raised an error or panicked; siblings were unaffected.
    Failed(String),
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Cached => write!(f, "cached"),
            JobStatus::Success => write!(f, "success"),
            JobStatus::Failed(message) => write!(f, "failed:{}", message),
        }
    }
}

/// One line of the batch report returned by [`Runner::run_jobs`].
#[derive(Debug, Clone)]
pub struct JobReport {
    pub job: Job,
    pub status: JobStatus,
    pub path: Option<PathBuf>,
}

/// A cache-sensitive, parallel dispatcher for experiment jobs.
///
/// Pending jobs are submitted as independent tasks to a bounded worker
/// pool; each task runs all repetitions of one job sequentially, with a
/// fresh algorithm instance per repetition, and persists one aggregated
/// result. Failures are isolated per task: the batch always produces a
/// complete status report.
pub struct Runner {
    cache: JobCache,
    registry: Arc<AlgorithmRegistry>,
    max_workers: Option<usize>,
}

impl Runner {
    pub fn new(cache: JobCache, registry: Arc<AlgorithmRegistry>) -> Self {
        Self {
            cache,
            registry,
            max_workers: None,
        }
    }

    /// Bounds the worker pool explicitly instead of using the host's
    /// available concurrency.
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = Some(workers);
        self
    }

    fn worker_count(&self) -> usize {
        self.max_workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|count| count.get())
                .unwrap_or(1)
        })
    }

    /// Runs the given jobs, optionally ignoring the cache.
    ///
    /// Returns one report per job: `cached` jobs are skipped up front,
    /// pending jobs come back as `success` or `failed:<message>` in
    /// completion order.
    pub fn run_jobs(&self, jobs: Vec<Job>, force: bool) -> Result<Vec<JobReport>> {
        let mut reports: Vec<JobReport> = Vec::new();
        let mut pending: Vec<(Job, PathBuf)> = Vec::new();

        for job in jobs {
            let key = self.cache.job_key(&job);
            let path = self.cache.result_path(&job, &key);
            if !force && self.cache.is_cached(&path) {
                reports.push(JobReport {
                    job,
                    status: JobStatus::Cached,
                    path: Some(path),
                });
            } else {
                pending.push((job, path));
            }
        }

        info!(
            cached = reports.len(),
            pending = pending.len(),
            "job batch partitioned"
        );
        if pending.is_empty() {
            return Ok(reports);
        }

        // One progress counter per algorithm, so slow groups stay visible
        // in isolation.
        let mut totals: BTreeMap<String, usize> = BTreeMap::new();
        for (job, _) in &pending {
            *totals.entry(job.algorithm.clone()).or_default() += 1;
        }
        let progress: BTreeMap<String, AtomicUsize> = totals
            .keys()
            .map(|name| (name.clone(), AtomicUsize::new(0)))
            .collect();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.worker_count())
            .build()
            .map_err(|e| {
                ExperimentError::Execution(format!("failed to build worker pool: {}", e))
            })?;

        let executed: Vec<JobReport> = pool.install(|| {
            pending
                .into_par_iter()
                .map(|(job, path)| {
                    let outcome = catch_unwind(AssertUnwindSafe(|| self.run_single(&job, &path)));
                    let status = match outcome {
                        Ok(Ok(())) => JobStatus::Success,
                        Ok(Err(err)) => JobStatus::Failed(err.to_string()),
                        Err(panic) => JobStatus::Failed(panic_message(panic)),
                    };

                    let done = progress[&job.algorithm].fetch_add(1, Ordering::SeqCst) + 1;
                    let total = totals[&job.algorithm];
                    match &status {
                        JobStatus::Failed(message) => warn!(
                            algorithm = %job.algorithm,
                            done,
                            total,
                            description = %job.description,
                            error = %message,
                            "job failed"
                        ),
                        _ => info!(algorithm = %job.algorithm, done, total, "job finished"),
                    }

                    let path = matches!(status, JobStatus::Success).then_some(path);
                    JobReport { job, status, path }
                })
                .collect()
        });

        reports.extend(executed);
        Ok(reports)
    }

    /// Runs all repetitions of one job and persists the aggregated result.
    fn run_single(&self, job: &Job, path: &Path) -> Result<()> {
        let mut results = Vec::with_capacity(job.reps);
        for repetition in 0..job.reps {
            // A fresh instance per repetition keeps runs independent.
            let mut algorithm = self
                .registry
                .create(&job.algorithm, job.n, &job.algo_args)?;
            debug!(
                algorithm = %algorithm,
                repetition,
                description = %job.description,
                "starting repetition"
            );
            let outcome = algorithm.run(job.problem.as_ref(), job.optimum, job.max_evals)?;
            results.push(outcome);
        }

        let result = ExperimentResult {
            results,
            metadata: ExperimentMetadata {
                run_name: self.cache.run_name().map(str::to_owned),
                algorithm: job.algorithm.clone(),
                benchmark_name: job.benchmark_name.clone(),
                n: job.n,
                reps: job.reps,
                algo_args: job.algo_args.clone(),
                description: job.description.clone(),
                optimum: job.optimum,
                max_evals: job.max_evals,
                budget_description: job.budget_description.clone(),
            },
        };

        self.cache.store(path, &result)
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("panic: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("panic: {}", message)
    } else {
        "panic: unknown cause".to_string()
    }
}
