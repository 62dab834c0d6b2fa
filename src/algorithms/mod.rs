//! # Algorithm Variants
//!
//! The family of (2+1) diversity-exploiting genetic algorithms plus the
//! univariate marginal distribution algorithm, all sharing one `run`
//! contract: search until the optimum is reached or the evaluation budget
//! is exhausted, and report the best fitness seen together with the number
//! of fitness evaluations consumed. Budget exhaustion is a normal terminal
//! outcome, not an error.

pub mod dega;
pub mod dega_a;
pub mod dega_b;
pub mod dega_limit;
pub mod registry;
pub mod umda;

pub use dega::Dega;
pub use dega_a::DegaA;
pub use dega_b::DegaB;
pub use dega_limit::DegaLimit;
pub use registry::{AlgoArgs, AlgorithmConstructor, AlgorithmRegistry};
pub use umda::Umda;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::benchmarks::FitnessProblem;
use crate::bitstring::{Bitstring, Individual};
use crate::error::{ExperimentError, Result};
use crate::rng::RandomNumberGenerator;

/// Terminal state of one run: best fitness reached and evaluations used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub best: f64,
    pub evals: u64,
}

/// A per-run search procedure over fixed-length bit vectors.
///
/// Instances are single-use: the runner constructs a fresh instance for
/// every repetition and discards it once `run` returns.
pub trait Algorithm: fmt::Display + Send {
    /// Searches until `optimum` is reached or `max_evals` fitness
    /// evaluations have been consumed.
    fn run(
        &mut self,
        problem: &dyn FitnessProblem,
        optimum: f64,
        max_evals: u64,
    ) -> Result<RunOutcome>;
}

/// Scores a candidate, rejecting non-finite fitness values.
fn evaluate(problem: &dyn FitnessProblem, candidate: &Bitstring) -> Result<f64> {
    let fitness = problem.evaluate(candidate);
    if !fitness.is_finite() {
        return Err(ExperimentError::InvalidNumericValue(format!(
            "non-finite fitness {} for candidate of length {}",
            fitness,
            candidate.len()
        )));
    }
    Ok(fitness)
}

/// Draws and evaluates the initial population: a uniformly random
/// candidate and its bitwise complement (2 evaluations).
fn initial_pair(
    n: usize,
    problem: &dyn FitnessProblem,
    rng: &mut RandomNumberGenerator,
) -> Result<(Individual, Individual)> {
    let x1 = Bitstring::random(n, rng);
    let x2 = x1.complement();
    let f1 = evaluate(problem, &x1)?;
    let f2 = evaluate(problem, &x2)?;
    Ok((Individual::new(x1, f1), Individual::new(x2, f2)))
}
