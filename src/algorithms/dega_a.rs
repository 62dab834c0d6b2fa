use std::fmt;

use super::{evaluate, initial_pair, Algorithm, RunOutcome};
use crate::benchmarks::FitnessProblem;
use crate::bitstring::Individual;
use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::selection::{biased_crossover, select_population_dega_a};

/// A parameter-free (2+1) DEGA variant.
///
/// No lambda value is required: the crossover bias of the refinement loop
/// is adapted dynamically from the Hamming distance between the offspring
/// and the current best. Each iteration flips a fair coin between a
/// mutation step (with deterministic two-way replacement) and a crossover
/// step with a first-improvement refinement loop.
#[derive(Debug, Clone)]
pub struct DegaA {
    n: usize,
    chi: f64,
    rng: RandomNumberGenerator,
}

impl DegaA {
    pub fn new(n: usize) -> Self {
        Self {
            n,
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

impl fmt::Display for DegaA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(2+1)-DEGA_A(n={}, chi={})", self.n, self.chi)
    }
}

impl Algorithm for DegaA {
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
                // Mutation step with deterministic replacement.
                let (parent, other) = if self.rng.coin() { (x1, x2) } else { (x2, x1) };

                let off_bits = parent.bits.flip_bits(self.chi / self.n as f64, &mut self.rng);
                let f_off = evaluate(problem, &off_bits)?;
                evals += 1;
                let offspring = Individual::new(off_bits, f_off);

                let (a, b) = select_population_dega_a(offspring, parent, other);
                x1 = a;
                x2 = b;
            } else {
                // Crossover step: an unbiased offspring, then refinement
                // with bias 1/d toward the better parent.
                let y = biased_crossover(&x1.bits, &x2.bits, 0.5, &mut self.rng);

                if x1.fitness > x2.fitness {
                    std::mem::swap(&mut x1, &mut x2);
                }

                let f_y = evaluate(problem, &y)?;
                evals += 1;

                if f_y > x1.fitness {
                    let distance = y.hamming_distance(&x1.bits);
                    // An offspring identical to the worse parent leaves
                    // nothing to refine; the 1/distance bias is never formed.
                    if distance > 0 {
                        let rounds = (distance as f64 * (self.n as f64).ln()) as u64;
                        for _ in 0..rounds {
                            let off = biased_crossover(
                                &x1.bits,
                                &y,
                                1.0 / distance as f64,
                                &mut self.rng,
                            );
                            let f_off = evaluate(problem, &off)?;
                            evals += 1;

                            // Stop at the first improving refinement.
                            if f_off > x1.fitness {
                                x1 = Individual::new(off, f_off);
                                break;
                            }
                        }
                    }
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
    fn test_converges_on_one_max() {
        let mut algorithm = DegaA::new(8).with_rng(RandomNumberGenerator::from_seed(23));
        let outcome = algorithm
            .run(&OneMax, 8.0, 100_000)
            .expect("run should succeed");

        assert_eq!(outcome.best, 8.0);
    }
}
