use crate::bitstring::Bitstring;
use crate::rng::RandomNumberGenerator;

/// Biased uniform crossover.
///
/// Returns a new candidate equal to `a` except that each bit is replaced by
/// `b`'s corresponding bit independently with probability `p`. With
/// `p = 0.5` this is plain uniform crossover; small `p` keeps the offspring
/// close to `a`.
pub fn biased_crossover(
    a: &Bitstring,
    b: &Bitstring,
    p: f64,
    rng: &mut RandomNumberGenerator,
) -> Bitstring {
    debug_assert_eq!(a.len(), b.len());
    let bits = a
        .bits()
        .iter()
        .zip(b.bits().iter())
        .map(|(&x, &y)| if rng.chance(p) { y } else { x })
        .collect();
    Bitstring::from_bits(bits)
}
