use super::FitnessProblem;
use crate::bitstring::Bitstring;

/// The LeadingOnes landscape: the number of consecutive one-bits at the
/// start of the candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadingOnes;

impl FitnessProblem for LeadingOnes {
    fn evaluate(&self, candidate: &Bitstring) -> f64 {
        candidate.bits().iter().take_while(|&&b| b == 1).count() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_leading_ones_only() {
        assert_eq!(
            LeadingOnes.evaluate(&Bitstring::from_bits(vec![1, 1, 0, 1])),
            2.0
        );
        assert_eq!(
            LeadingOnes.evaluate(&Bitstring::from_bits(vec![0, 1, 1, 1])),
            0.0
        );
        assert_eq!(
            LeadingOnes.evaluate(&Bitstring::from_bits(vec![1, 1, 1, 1])),
            4.0
        );
    }
}
