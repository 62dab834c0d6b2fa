use std::fmt;

use super::{evaluate, Algorithm, RunOutcome};
use crate::benchmarks::FitnessProblem;
use crate::bitstring::Bitstring;
use crate::error::{ExperimentError, Result};
use crate::rng::RandomNumberGenerator;

/// The Univariate Marginal Distribution Algorithm.
///
/// Instead of explicit individuals the algorithm maintains a per-bit
/// marginal probability vector. Each generation samples `lambda`
/// candidates from the model, selects the `mu` fittest as elites and moves
/// the model to their elementwise mean, clipped into `[1/n, 1 - 1/n]` for
/// numerical stability.
#[derive(Debug, Clone)]
pub struct Umda {
    n: usize,
    lambda: usize,
    mu: usize,
    probabilities: Vec<f64>,
    rng: RandomNumberGenerator,
}

impl Umda {
    /// Creates the algorithm with population size `lambda` and elite size
    /// `mu`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `mu` is zero or exceeds `lambda`.
    pub fn new(n: usize, lambda: usize, mu: usize) -> Result<Self> {
        if mu == 0 {
            return Err(ExperimentError::Configuration(
                "UMDA elite size mu must be at least 1".to_string(),
            ));
        }
        if mu > lambda {
            return Err(ExperimentError::Configuration(format!(
                "UMDA elite size mu ({}) cannot exceed population size lambda ({})",
                mu, lambda
            )));
        }

        Ok(Self {
            n,
            lambda,
            mu,
            probabilities: vec![0.5; n],
            rng: RandomNumberGenerator::new(),
        })
    }

    /// Replaces the internal randomness source, for deterministic runs.
    pub fn with_rng(mut self, rng: RandomNumberGenerator) -> Self {
        self.rng = rng;
        self
    }

    /// The current marginal probability vector.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    fn sample(&mut self) -> Bitstring {
        let bits = (0..self.n)
            .map(|i| u8::from(self.rng.chance(self.probabilities[i])))
            .collect();
        Bitstring::from_bits(bits)
    }
}

impl fmt::Display for Umda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UMDA(n={}, mu={}, lambda={})",
            self.n, self.mu, self.lambda
        )
    }
}

impl Algorithm for Umda {
    fn run(
        &mut self,
        problem: &dyn FitnessProblem,
        optimum: f64,
        max_evals: u64,
    ) -> Result<RunOutcome> {
        let mut evals: u64 = 0;
        let mut best = f64::MIN;

        while evals < max_evals {
            // Sample a whole generation from the marginal model.
            let population: Vec<Bitstring> = (0..self.lambda).map(|_| self.sample()).collect();
            let mut fitness = Vec::with_capacity(self.lambda);
            for candidate in &population {
                fitness.push(evaluate(problem, candidate)?);
            }
            evals += self.lambda as u64;

            // Highest fitness first; the stable sort keeps earlier-sampled
            // candidates ahead on ties.
            let mut order: Vec<usize> = (0..self.lambda).collect();
            order.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));
            let elites: Vec<&Bitstring> = order
                .iter()
                .take(self.mu)
                .map(|&i| &population[i])
                .collect();

            // Move the model to the elite mean, clipped away from the borders.
            let min_probability = 1.0 / self.n as f64;
            let max_probability = 1.0 - min_probability;
            for i in 0..self.n {
                let mean = elites.iter().map(|bits| bits.get(i) as f64).sum::<f64>()
                    / self.mu as f64;
                self.probabilities[i] = mean.max(min_probability).min(max_probability);
            }

            best = fitness[order[0]];
            if best >= optimum {
                return Ok(RunOutcome { best, evals });
            }
        }

        Ok(RunOutcome { best, evals })
    }
}
