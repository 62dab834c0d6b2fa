use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::warn;

use super::job::{ExperimentResult, Job};
use crate::error::{ExperimentError, Result, ResultExt};

/// Content-addressed store for experiment results.
///
/// Results are partitioned on disk by algorithm and benchmark and
/// addressed by a deterministic hash of the job's value, so value-identical
/// jobs share one path and concurrent workers never write to the same file
/// unless their jobs are equal (in which case both write the same content).
///
/// An optional run name namespaces the whole store
/// (`<data_dir>/<run_name>/...`), keeping unrelated batches apart.
#[derive(Debug, Clone)]
pub struct JobCache {
    data_dir: PathBuf,
    run_name: Option<String>,
}

impl JobCache {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            run_name: None,
        }
    }

    pub fn with_run_name(data_dir: impl Into<PathBuf>, run_name: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            run_name: Some(run_name.into()),
        }
    }

    pub fn run_name(&self) -> Option<&str> {
        self.run_name.as_deref()
    }

    /// Root folder of the store (`data_dir` or `data_dir/<run_name>`).
    pub fn data_root(&self) -> PathBuf {
        match &self.run_name {
            Some(name) => self.data_dir.join(name),
            None => self.data_dir.clone(),
        }
    }

    /// Derives the deterministic content key of a job: a SHA-256 digest
    /// over the canonical (sorted-key) serialization of all job fields
    /// except the problem callable.
    pub fn job_key(&self, job: &Job) -> String {
        let mut fields = Map::new();
        fields.insert("algo_args".to_string(), Value::Object(
            job.algo_args
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ));
        fields.insert(
            "algorithm".to_string(),
            Value::String(job.algorithm.clone()),
        );
        fields.insert(
            "benchmark_name".to_string(),
            Value::String(job.benchmark_name.clone()),
        );
        fields.insert(
            "budget_description".to_string(),
            match &job.budget_description {
                Some(text) => Value::String(text.clone()),
                None => Value::Null,
            },
        );
        fields.insert(
            "description".to_string(),
            Value::String(job.description.clone()),
        );
        fields.insert("max_evals".to_string(), Value::from(job.max_evals));
        fields.insert("n".to_string(), Value::from(job.n));
        fields.insert("optimum".to_string(), Value::from(job.optimum));
        fields.insert("reps".to_string(), Value::from(job.reps));

        let canonical = Value::Object(fields).to_string();
        let digest = Sha256::digest(canonical.as_bytes());
        hex::encode(digest)
    }

    /// Storage path of a job's persisted result.
    pub fn result_path(&self, job: &Job, key: &str) -> PathBuf {
        self.data_root()
            .join(&job.algorithm)
            .join(&job.benchmark_name)
            .join(format!("{}.json", key))
    }

    /// Returns `true` when a readable, well-formed result is already
    /// stored at `path`. An unreadable or corrupt file is reported and
    /// treated as a miss, so the job is simply recomputed.
    pub fn is_cached(&self, path: &Path) -> bool {
        if !path.exists() {
            return false;
        }
        match self.load(path) {
            Ok(_) => true,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "discarding unreadable cached result"
                );
                false
            }
        }
    }

    /// Reads a persisted result back.
    pub fn load(&self, path: &Path) -> Result<ExperimentResult> {
        let raw = fs::read_to_string(path)
            .context(format!("Failed to read cached result '{}'", path.display()))?;
        serde_json::from_str(&raw).map_err(|e| {
            ExperimentError::Cache(format!("corrupt result at '{}': {}", path.display(), e))
        })
    }

    /// Persists a result, creating parent directories as needed and
    /// overwriting any previous result stored under the same key.
    pub fn store(&self, path: &Path, result: &ExperimentResult) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context(format!(
                "Failed to create result directory '{}'",
                parent.display()
            ))?;
        }
        let payload = serde_json::to_string_pretty(result)?;
        fs::write(path, payload)
            .context(format!("Failed to write result '{}'", path.display()))?;
        Ok(())
    }
}
