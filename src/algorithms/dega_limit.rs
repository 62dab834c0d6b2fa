use std::fmt;

use super::{evaluate, initial_pair, Algorithm, RunOutcome};
use crate::benchmarks::FitnessProblem;
use crate::bitstring::Individual;
use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::selection::{biased_crossover, select_population_limit};

/// The standard DEGA limited to guarantee some mutation from time to time.
///
/// A counter tracks consecutive exploitation steps without an accepted
/// improvement; once it exceeds `u` the diversity phase is forced even
/// while the two fitnesses differ. The counter resets whenever a
/// refinement round improves the worse individual or the diversity phase
/// keeps its offspring.
#[derive(Debug, Clone)]
pub struct DegaLimit {
    n: usize,
    lambda: u64,
    chi: f64,
    u: u64,
    rng: RandomNumberGenerator,
}

impl DegaLimit {
    /// Creates the variant with the default limit `u = floor(lambda * ln(n))`.
    pub fn new(n: usize, lambda: u64) -> Self {
        let u = (lambda as f64 * (n as f64).ln()) as u64;
        Self::with_limit(n, lambda, u)
    }

    /// Creates the variant with an explicit exploitation limit.
    pub fn with_limit(n: usize, lambda: u64, u: u64) -> Self {
        Self {
            n,
            lambda,
            chi: 1.0,
            u,
            rng: RandomNumberGenerator::new(),
        }
    }

    /// Replaces the internal randomness source, for deterministic runs.
    pub fn with_rng(mut self, rng: RandomNumberGenerator) -> Self {
        self.rng = rng;
        self
    }
}

impl fmt::Display for DegaLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(2+1)-DEGA(n={}, lambda={}, chi={}) [limited to u={}]",
            self.n, self.lambda, self.chi, self.u
        )
    }
}

impl Algorithm for DegaLimit {
    fn run(
        &mut self,
        problem: &dyn FitnessProblem,
        optimum: f64,
        max_evals: u64,
    ) -> Result<RunOutcome> {
        let (mut x1, mut x2) = initial_pair(self.n, problem, &mut self.rng)?;
        let mut evals: u64 = 2;
        let mut stale: u64 = 0;

        while evals < max_evals {
            let best = x1.fitness.max(x2.fitness);
            if best >= optimum {
                return Ok(RunOutcome { best, evals });
            }

            if x1.fitness != x2.fitness && stale <= self.u {
                // Exploitation: one unbiased crossover, then refinement
                // with bias 1/lambda on strict improvement.
                let y = biased_crossover(&x1.bits, &x2.bits, 0.5, &mut self.rng);

                if x1.fitness > x2.fitness {
                    std::mem::swap(&mut x1, &mut x2);
                }

                let f_y = evaluate(problem, &y)?;
                evals += 1;
                stale += 1;

                if f_y > x1.fitness {
                    for _ in 0..self.u {
                        let off = biased_crossover(
                            &x1.bits,
                            &y,
                            1.0 / self.lambda as f64,
                            &mut self.rng,
                        );
                        let f_off = evaluate(problem, &off)?;
                        evals += 1;

                        if f_off > x1.fitness {
                            stale = 0;
                            x1 = Individual::new(off, f_off);
                            break;
                        }
                    }
                }
            } else {
                // Forced or natural diversity phase.
                let (parent, other) = if self.rng.coin() { (x1, x2) } else { (x2, x1) };

                let off_bits = parent.bits.flip_bits(self.chi / self.n as f64, &mut self.rng);
                let f_off = evaluate(problem, &off_bits)?;
                evals += 1;
                let offspring = Individual::new(off_bits, f_off);

                let ((a, b), kept_offspring) =
                    select_population_limit(other, parent, offspring, &mut self.rng);
                x1 = a;
                x2 = b;
                if kept_offspring {
                    stale = 0;
                }
            }
        }

        Ok(RunOutcome {
            best: x1.fitness.max(x2.fitness),
            evals,
        })
    }
}
