//! # Bitstring
//!
//! The candidate representation shared by every algorithm in this crate: a
//! fixed-length vector of 0/1 values, plus the `Individual` pairing of a
//! candidate with its evaluated fitness.
//!
//! Candidates are treated as immutable once evaluated; new candidates are
//! produced by copy-then-mutate (`flip_bits`) or by crossover (see the
//! `selection` module).

use std::fmt;

use crate::rng::RandomNumberGenerator;

/// A fixed-length vector of 0/1 values representing one candidate solution.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Bitstring {
    bits: Vec<u8>,
}

impl Bitstring {
    /// Draws a uniformly random bit vector of length `n`.
    pub fn random(n: usize, rng: &mut RandomNumberGenerator) -> Self {
        let bits = (0..n).map(|_| u8::from(rng.coin())).collect();
        Self { bits }
    }

    /// Wraps an existing bit vector. Entries must be 0 or 1.
    pub fn from_bits(bits: Vec<u8>) -> Self {
        debug_assert!(bits.iter().all(|&b| b <= 1));
        Self { bits }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns `true` for the zero-length bit vector.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The raw 0/1 entries.
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// The bit at position `index`.
    pub fn get(&self, index: usize) -> u8 {
        self.bits[index]
    }

    /// The bitwise complement.
    pub fn complement(&self) -> Self {
        let bits = self.bits.iter().map(|&b| 1 - b).collect();
        Self { bits }
    }

    /// Number of one-bits.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().map(|&b| b as usize).sum()
    }

    /// Number of positions at which `self` and `other` differ.
    ///
    /// Both vectors must have the same length.
    pub fn hamming_distance(&self, other: &Self) -> usize {
        debug_assert_eq!(self.len(), other.len());
        self.bits
            .iter()
            .zip(other.bits.iter())
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Returns a copy with each bit flipped independently with probability
    /// `rate`.
    pub fn flip_bits(&self, rate: f64, rng: &mut RandomNumberGenerator) -> Self {
        let bits = self
            .bits
            .iter()
            .map(|&b| if rng.chance(rate) { 1 - b } else { b })
            .collect();
        Self { bits }
    }
}

impl fmt::Debug for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitstring(\"")?;
        for &b in &self.bits {
            write!(f, "{}", b)?;
        }
        write!(f, "\")")
    }
}

/// A candidate together with its evaluated fitness.
#[derive(Clone, Debug)]
pub struct Individual {
    pub bits: Bitstring,
    pub fitness: f64,
}

impl Individual {
    pub fn new(bits: Bitstring, fitness: f64) -> Self {
        Self { bits, fitness }
    }

    /// Hamming distance between the two candidates.
    pub fn hamming_distance(&self, other: &Self) -> usize {
        self.bits.hamming_distance(&other.bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_has_correct_length_and_domain() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        for n in [0, 1, 10, 100] {
            let bits = Bitstring::random(n, &mut rng);
            assert_eq!(bits.len(), n);
            assert!(bits.bits().iter().all(|&b| b == 0 || b == 1));
        }
    }

    #[test]
    fn test_complement_flips_every_bit() {
        let bits = Bitstring::from_bits(vec![0, 1, 1, 0, 1]);
        let complement = bits.complement();

        assert_eq!(complement.bits(), &[1, 0, 0, 1, 0]);
        assert_eq!(bits.hamming_distance(&complement), 5);
    }

    #[test]
    fn test_count_ones() {
        let bits = Bitstring::from_bits(vec![1, 0, 1, 1, 0]);
        assert_eq!(bits.count_ones(), 3);
    }

    #[test]
    fn test_hamming_distance() {
        let a = Bitstring::from_bits(vec![0, 0, 1, 1]);
        let b = Bitstring::from_bits(vec![0, 1, 1, 0]);

        assert_eq!(a.hamming_distance(&b), 2);
        assert_eq!(a.hamming_distance(&a), 0);
    }

    #[test]
    fn test_flip_bits_rate_zero_is_identity() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let bits = Bitstring::from_bits(vec![1, 0, 1, 0, 1, 0]);
        let flipped = bits.flip_bits(0.0, &mut rng);

        assert_eq!(flipped, bits);
    }

    #[test]
    fn test_flip_bits_rate_one_is_complement() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let bits = Bitstring::from_bits(vec![1, 0, 1, 0, 1, 0]);
        let flipped = bits.flip_bits(1.0, &mut rng);

        assert_eq!(flipped, bits.complement());
    }

    #[test]
    fn test_debug_is_compact() {
        let bits = Bitstring::from_bits(vec![1, 0, 1]);
        assert_eq!(format!("{:?}", bits), "Bitstring(\"101\")");
    }
}
