use std::fmt;

use super::{evaluate, initial_pair, Algorithm, RunOutcome};
use crate::benchmarks::FitnessProblem;
use crate::bitstring::Individual;
use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::selection::{biased_crossover, select_population};

/// The standard (2+1) diversity-exploiting genetic algorithm.
///
/// While the two individuals have different fitnesses the algorithm
/// exploits: the worse one is crossed toward the better one with bias
/// `1/lambda` and replaced only on strict improvement. Once the fitnesses
/// collide it diversifies: one individual is mutated by standard bit flips
/// at rate `chi/n` and the three-way replacement rule decides which pair
/// survives.
#[derive(Debug, Clone)]
pub struct Dega {
    n: usize,
    lambda: u64,
    chi: f64,
    rng: RandomNumberGenerator,
}

impl Dega {
    pub fn new(n: usize, lambda: u64) -> Self {
        Self {
            n,
            lambda,
            chi: 1.0,
            rng: RandomNumberGenerator::new(),
        }
    }

    /// Replaces the internal randomness source, for deterministic runs.
    pub fn with_rng(mut self, rng: RandomNumberGenerator) -> Self {
        self.rng = rng;
        self
    }
}

impl fmt::Display for Dega {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(2+1)-DEGA(n={}, lambda={}, chi={})",
            self.n, self.lambda, self.chi
        )
    }
}

impl Algorithm for Dega {
    fn run(
        &mut self,
        problem: &dyn FitnessProblem,
        optimum: f64,
        max_evals: u64,
    ) -> Result<RunOutcome> {
        let (mut x1, mut x2) = initial_pair(self.n, problem, &mut self.rng)?;
        let mut evals: u64 = 2;

        while evals < max_evals {
            let best = x1.fitness.max(x2.fitness);
            if best >= optimum {
                return Ok(RunOutcome { best, evals });
            }

            if x1.fitness != x2.fitness {
                // Exploitation: refine the worse individual toward the better one.
                if x1.fitness > x2.fitness {
                    std::mem::swap(&mut x1, &mut x2);
                }

                let off = biased_crossover(
                    &x1.bits,
                    &x2.bits,
                    1.0 / self.lambda as f64,
                    &mut self.rng,
                );
                let f_off = evaluate(problem, &off)?;
                evals += 1;

                if f_off > x1.fitness {
                    x1 = Individual::new(off, f_off);
                }
            } else {
                // Diversity: mutate one individual, keep the best pair of three.
                let (parent, other) = if self.rng.coin() { (x1, x2) } else { (x2, x1) };

                let off_bits = parent.bits.flip_bits(self.chi / self.n as f64, &mut self.rng);
                let f_off = evaluate(problem, &off_bits)?;
                evals += 1;
                let offspring = Individual::new(off_bits, f_off);

                let (a, b) = select_population(other, parent, offspring, &mut self.rng);
                x1 = a;
                x2 = b;
            }
        }

        Ok(RunOutcome {
            best: x1.fitness.max(x2.fitness),
            evals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarks::OneMax;

    #[test]
    fn test_converges_on_one_max() {
        let mut algorithm = Dega::new(8, 2).with_rng(RandomNumberGenerator::from_seed(17));
        let outcome = algorithm
            .run(&OneMax, 8.0, 100_000)
            .expect("run should succeed");

        assert_eq!(outcome.best, 8.0);
        assert!(outcome.evals >= 2);
        assert!(outcome.evals < 100_000);
    }

    #[test]
    fn test_budget_exhaustion_is_normal() {
        // Two evaluations are spent on the initial pair, after which the
        // budget is already exceeded.
        let mut algorithm = Dega::new(16, 2).with_rng(RandomNumberGenerator::from_seed(3));
        let outcome = algorithm
            .run(&OneMax, 16.0, 2)
            .expect("run should succeed");

        assert_eq!(outcome.evals, 2);
        assert!(outcome.best <= 16.0);
    }
}
