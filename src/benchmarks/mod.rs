//! # Benchmarks
//!
//! Canonical pseudo-Boolean fitness landscapes and the registry that maps
//! short benchmark keys to a problem, its known optimum and a default
//! evaluation budget.
//!
//! Fitness is a scalar where higher is better. Problems must be safe to
//! call many times on the same candidate; they may be stochastic, but
//! repeated calls during one run must stay comparable.

pub mod jump;
pub mod leading_ones;
pub mod linear_harmonic;
pub mod one_max;

pub use jump::Jump;
pub use leading_ones::LeadingOnes;
pub use linear_harmonic::LinearHarmonic;
pub use one_max::OneMax;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::bitstring::Bitstring;
use crate::error::{ExperimentError, Result};

/// A pseudo-Boolean fitness function over fixed-length bit vectors.
pub trait FitnessProblem: Send + Sync {
    /// Scores one candidate. Higher is better.
    fn evaluate(&self, candidate: &Bitstring) -> f64;
}

/// Bundles a fitness problem with its known optimum and default budget,
/// both as functions of the bit-vector length `n`.
#[derive(Clone)]
pub struct Benchmark {
    pub name: String,
    pub problem: Arc<dyn FitnessProblem>,
    optimum: fn(usize) -> f64,
    default_budget: fn(usize) -> u64,
}

impl Benchmark {
    pub fn new(
        name: impl Into<String>,
        problem: Arc<dyn FitnessProblem>,
        optimum: fn(usize) -> f64,
        default_budget: fn(usize) -> u64,
    ) -> Self {
        Self {
            name: name.into(),
            problem,
            optimum,
            default_budget,
        }
    }

    /// The best achievable fitness for bit vectors of length `n`.
    pub fn optimum(&self, n: usize) -> f64 {
        (self.optimum)(n)
    }

    /// The evaluation budget used when a job does not set one explicitly.
    pub fn default_budget(&self, n: usize) -> u64 {
        (self.default_budget)(n)
    }
}

/// `30 * n * ln(n)`, rounded down.
pub fn default_budget(n: usize) -> u64 {
    (30.0 * (n as f64) * (n as f64).ln()) as u64
}

/// Process-wide lookup table from benchmark keys to `Benchmark` descriptors.
///
/// The registry is built once at startup and treated as read-only
/// afterwards.
pub struct BenchmarkRegistry {
    registry: BTreeMap<String, Benchmark>,
}

impl BenchmarkRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            registry: BTreeMap::new(),
        }
    }

    /// The registry of built-in benchmarks.
    pub fn builtin() -> Self {
        let mut registry = BTreeMap::new();
        registry.insert(
            "LO".to_string(),
            Benchmark::new("LO", Arc::new(LeadingOnes), |n| n as f64, default_budget),
        );
        registry.insert(
            "OM".to_string(),
            Benchmark::new("OM", Arc::new(OneMax), |n| n as f64, default_budget),
        );
        registry.insert(
            "LFHW".to_string(),
            Benchmark::new(
                "LFHW",
                Arc::new(LinearHarmonic),
                |n| (n * (n + 1) / 2) as f64,
                default_budget,
            ),
        );
        registry.insert(
            "JUMP".to_string(),
            Benchmark::new("JUMP", Arc::new(Jump::new(4)), |n| n as f64, default_budget),
        );
        Self { registry }
    }

    /// Registers a benchmark under `key`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `key` is already registered.
    pub fn register(&mut self, key: impl Into<String>, benchmark: Benchmark) -> Result<()> {
        let key = key.into();
        if self.registry.contains_key(&key) {
            return Err(ExperimentError::Configuration(format!(
                "benchmark '{}' already registered",
                key
            )));
        }
        self.registry.insert(key, benchmark);
        Ok(())
    }

    /// Looks up a benchmark by key.
    ///
    /// # Errors
    ///
    /// Returns a configuration error listing the available keys if `key` is
    /// unknown.
    pub fn get(&self, key: &str) -> Result<&Benchmark> {
        self.registry.get(key).ok_or_else(|| {
            ExperimentError::Configuration(format!(
                "unknown benchmark '{}', available: {:?}",
                key,
                self.keys()
            ))
        })
    }

    /// The registered benchmark keys, in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.registry.keys().cloned().collect()
    }
}

impl Default for BenchmarkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_keys() {
        let registry = BenchmarkRegistry::builtin();
        assert_eq!(registry.keys(), vec!["JUMP", "LFHW", "LO", "OM"]);
    }

    #[test]
    fn test_get_unknown_lists_available() {
        let registry = BenchmarkRegistry::builtin();
        match registry.get("NOPE") {
            Err(ExperimentError::Configuration(msg)) => {
                assert!(msg.contains("NOPE"));
                assert!(msg.contains("LO"));
            }
            _ => panic!("Expected Configuration error"),
        }
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut registry = BenchmarkRegistry::builtin();
        let duplicate = Benchmark::new("OM", Arc::new(OneMax), |n| n as f64, default_budget);
        assert!(registry.register("OM", duplicate).is_err());
    }

    #[test]
    fn test_default_budget_rounds_down() {
        // 30 * 10 * ln(10) = 690.77...
        assert_eq!(default_budget(10), 690);
    }

    #[test]
    fn test_optimum_functions() {
        let registry = BenchmarkRegistry::builtin();
        assert_eq!(registry.get("LO").unwrap().optimum(100), 100.0);
        assert_eq!(registry.get("LFHW").unwrap().optimum(10), 55.0);
    }
}
