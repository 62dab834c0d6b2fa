use std::fmt;

use super::{evaluate, initial_pair, Algorithm, RunOutcome};
use crate::benchmarks::FitnessProblem;
use crate::bitstring::Individual;
use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::selection::{biased_crossover, select_population_alter_parent};

/// A (2+1) DEGA variant with a fixed crossover refinement budget.
///
/// The crossover step spends exactly `u` unbiased crossover attempts on an
/// improving offspring `y` and then installs `y` unconditionally as the new
/// worse individual. The mutation step replaces through the
/// parent-altering two-way rule.
#[derive(Debug, Clone)]
pub struct DegaB {
    n: usize,
    chi: f64,
    u: u64,
    rng: RandomNumberGenerator,
}

impl DegaB {
    /// Creates the variant with the default refinement budget
    /// `u = floor(10 * ln(n))`.
    pub fn new(n: usize) -> Self {
        let u = (10.0 * (n as f64).ln()) as u64;
        Self::with_budget(n, u)
    }

    /// Creates the variant with an explicit refinement budget.
    pub fn with_budget(n: usize, u: u64) -> Self {
        Self {
            n,
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

impl fmt::Display for DegaB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(2+1)-DEGA_B(n={}, chi={}) [limited to u={}]",
            self.n, self.chi, self.u
        )
    }
}

impl Algorithm for DegaB {
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

            if self.rng.coin() {
                // Mutation step.
                let (parent, other) = if self.rng.coin() { (x1, x2) } else { (x2, x1) };

                let off_bits = parent.bits.flip_bits(self.chi / self.n as f64, &mut self.rng);
                let f_off = evaluate(problem, &off_bits)?;
                evals += 1;
                let offspring = Individual::new(off_bits, f_off);

                let (a, b) =
                    select_population_alter_parent(other, parent, offspring, &mut self.rng);
                x1 = a;
                x2 = b;
            } else {
                // Crossover step with a fixed refinement budget.
                let mut y = biased_crossover(&x1.bits, &x2.bits, 0.5, &mut self.rng);

                if x1.fitness > x2.fitness {
                    std::mem::swap(&mut x1, &mut x2);
                }

                let mut f_y = evaluate(problem, &y)?;
                evals += 1;

                if f_y > x1.fitness {
                    for _ in 0..self.u {
                        let off = biased_crossover(&x1.bits, &y, 0.5, &mut self.rng);
                        let f_off = evaluate(problem, &off)?;
                        evals += 1;

                        // The bar stays at the worse parent's fitness; the
                        // evolving offspring replaces itself on every clear.
                        if f_off > x1.fitness {
                            y = off;
                            f_y = f_off;
                        }
                    }

                    x1 = Individual::new(y, f_y);
                }
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
    fn test_default_budget() {
        // floor(10 * ln(100)) = 46
        let algorithm = DegaB::new(100);
        assert_eq!(algorithm.u, 46);
    }

    #[test]
    fn test_converges_on_one_max() {
        let mut algorithm = DegaB::new(8).with_rng(RandomNumberGenerator::from_seed(29));
        let outcome = algorithm
            .run(&OneMax, 8.0, 100_000)
            .expect("run should succeed");

        assert_eq!(outcome.best, 8.0);
    }
}
