use super::FitnessProblem;
use crate::bitstring::Bitstring;

/// A linear function with harmonic weights: bit `i` (1-based) contributes
/// `i` when set. The optimum is the all-ones string with fitness
/// `n * (n + 1) / 2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearHarmonic;

impl FitnessProblem for LinearHarmonic {
    fn evaluate(&self, candidate: &Bitstring) -> f64 {
        candidate
            .bits()
            .iter()
            .enumerate()
            .map(|(i, &b)| (i + 1) as f64 * b as f64)
            .sum()
    }
}
