use std::cmp::Ordering;

use crate::bitstring::Individual;
use crate::rng::RandomNumberGenerator;

/// The lexicographic quality key of an unordered pair: best fitness first,
/// then the fitness of the weaker member.
fn pair_score(u: &Individual, v: &Individual) -> (f64, f64) {
    (u.fitness.max(v.fitness), u.fitness.min(v.fitness))
}

fn cmp_scores(a: (f64, f64), b: (f64, f64)) -> Ordering {
    a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1))
}

const PAIRS: [(usize, usize); 3] = [(0, 1), (0, 2), (1, 2)];

/// Picks the winning unordered pair among three candidates: maximize the
/// `(max, min)` fitness key, break ties by maximum pairwise Hamming
/// distance, break remaining ties uniformly at random.
fn winning_pair(members: &[Individual; 3], rng: &mut RandomNumberGenerator) -> usize {
    let scores: [(f64, f64); 3] = [
        pair_score(&members[0], &members[1]),
        pair_score(&members[0], &members[2]),
        pair_score(&members[1], &members[2]),
    ];
    let distances: [usize; 3] = [
        members[0].hamming_distance(&members[1]),
        members[0].hamming_distance(&members[2]),
        members[1].hamming_distance(&members[2]),
    ];

    let mut best: Vec<usize> = vec![0];
    for idx in 1..3 {
        match cmp_scores(scores[idx], scores[best[0]]) {
            Ordering::Greater => {
                best.clear();
                best.push(idx);
            }
            Ordering::Equal => best.push(idx),
            Ordering::Less => {}
        }
    }

    if best.len() > 1 {
        let max_distance = best.iter().map(|&i| distances[i]).max().unwrap_or(0);
        best.retain(|&i| distances[i] == max_distance);
    }

    if best.len() > 1 {
        best[rng.pick_index(best.len())]
    } else {
        best[0]
    }
}

/// Three-way replacement used by the diversity phase.
///
/// Among the three unordered pairs drawn from `{x1, x2, x3}`, keeps the
/// pair with the maximal `(max, min)` fitness key; ties go to the pair with
/// the larger Hamming distance, remaining ties are broken uniformly at
/// random. The surviving pair is returned with the fitter member first.
pub fn select_population(
    x1: Individual,
    x2: Individual,
    x3: Individual,
    rng: &mut RandomNumberGenerator,
) -> (Individual, Individual) {
    let members = [x1, x2, x3];
    let (i, j) = PAIRS[winning_pair(&members, rng)];

    let mut a = members[i].clone();
    let mut b = members[j].clone();
    if b.fitness > a.fitness {
        std::mem::swap(&mut a, &mut b);
    }
    (a, b)
}

/// Like [`select_population`], but also reports whether the surviving pair
/// contains the offspring (`x3`), which the caller uses to reset its
/// exploitation-limit counter. The pair keeps enumeration order.
pub fn select_population_limit(
    x1: Individual,
    x2: Individual,
    offspring: Individual,
    rng: &mut RandomNumberGenerator,
) -> ((Individual, Individual), bool) {
    let members = [x1, x2, offspring];
    let chosen = winning_pair(&members, rng);
    let (i, j) = PAIRS[chosen];
    let kept_offspring = j == 2;

    ((members[i].clone(), members[j].clone()), kept_offspring)
}

/// Deterministic two-way replacement: the offspring displaces the parent
/// only when strictly fitter, or when equally fit but further (in Hamming
/// distance) from the untouched `other` individual. Returns
/// `(winner, other)`.
pub fn select_population_dega_a(
    offspring: Individual,
    parent: Individual,
    other: Individual,
) -> (Individual, Individual) {
    match offspring.fitness.total_cmp(&parent.fitness) {
        Ordering::Less => (parent, other),
        Ordering::Equal => {
            if offspring.hamming_distance(&other) > parent.hamming_distance(&other) {
                (offspring, other)
            } else {
                (parent, other)
            }
        }
        Ordering::Greater => (offspring, other),
    }
}

/// Two-way replacement keeping `other` fixed and choosing between `parent`
/// and `offspring`: strictly fitter wins; on equal fitness the one further
/// from `other` wins, with an exact distance tie decided by a fair coin.
/// Returns `(other, winner)`.
pub fn select_population_alter_parent(
    other: Individual,
    parent: Individual,
    offspring: Individual,
    rng: &mut RandomNumberGenerator,
) -> (Individual, Individual) {
    match offspring.fitness.total_cmp(&parent.fitness) {
        Ordering::Greater => (other, offspring),
        Ordering::Equal => {
            let parent_distance = other.hamming_distance(&parent);
            let offspring_distance = other.hamming_distance(&offspring);

            match parent_distance.cmp(&offspring_distance) {
                Ordering::Greater => (other, parent),
                Ordering::Equal => {
                    if rng.coin() {
                        (other, parent)
                    } else {
                        (other, offspring)
                    }
                }
                Ordering::Less => (other, offspring),
            }
        }
        Ordering::Less => (other, parent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstring::Bitstring;

    fn individual(bits: Vec<u8>, fitness: f64) -> Individual {
        Individual::new(Bitstring::from_bits(bits), fitness)
    }

    #[test]
    fn test_select_population_keeps_two_best() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let a = individual(vec![1, 1, 1], 3.0);
        let b = individual(vec![1, 1, 0], 2.0);
        let c = individual(vec![1, 0, 0], 1.0);

        let (first, second) = select_population(a, b, c, &mut rng);
        assert_eq!(first.fitness, 3.0);
        assert_eq!(second.fitness, 2.0);
    }

    #[test]
    fn test_select_population_orders_by_fitness() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let a = individual(vec![1, 0, 0], 1.0);
        let b = individual(vec![1, 1, 1], 3.0);
        let c = individual(vec![1, 1, 0], 2.0);

        let (first, second) = select_population(a, b, c, &mut rng);
        assert!(first.fitness >= second.fitness);
        assert_eq!((first.fitness, second.fitness), (3.0, 2.0));
    }

    #[test]
    fn test_select_population_ties_broken_by_hamming_distance() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        // All fitnesses equal, so every pair shares the same score key;
        // the complementary pair is the most distant and must survive.
        let a = individual(vec![0, 0, 0, 0], 1.0);
        let b = individual(vec![1, 1, 1, 1], 1.0);
        let c = individual(vec![0, 0, 1, 1], 1.0);

        let (first, second) = select_population(a.clone(), b.clone(), c, &mut rng);
        let survivors = [first.bits.clone(), second.bits.clone()];
        assert!(survivors.contains(&a.bits));
        assert!(survivors.contains(&b.bits));
    }

    #[test]
    fn test_select_population_limit_flags_offspring() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let a = individual(vec![0, 0, 0], 1.0);
        let b = individual(vec![1, 1, 0], 2.0);
        let off = individual(vec![1, 1, 1], 3.0);

        let ((first, second), kept) = select_population_limit(a, b, off, &mut rng);
        assert!(kept);
        assert_eq!((first.fitness, second.fitness), (2.0, 3.0));
    }

    #[test]
    fn test_select_population_limit_without_offspring() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let a = individual(vec![1, 1, 0], 3.0);
        let b = individual(vec![1, 0, 1], 2.0);
        let off = individual(vec![0, 0, 0], 0.0);

        let ((first, second), kept) = select_population_limit(a, b, off, &mut rng);
        assert!(!kept);
        assert_eq!((first.fitness, second.fitness), (3.0, 2.0));
    }

    #[test]
    fn test_dega_a_equal_fitness_prefers_distant_offspring() {
        // Equal fitness: the offspring survives only because it is further
        // from `other` than the parent is.
        let offspring = individual(vec![1, 1, 1, 1], 2.0);
        let parent = individual(vec![0, 0, 1, 1], 2.0);
        let other = individual(vec![0, 0, 0, 0], 2.0);

        let (winner, _) = select_population_dega_a(offspring.clone(), parent, other);
        assert_eq!(winner.bits, offspring.bits);
    }

    #[test]
    fn test_dega_a_equal_fitness_keeps_parent_on_distance_tie() {
        let offspring = individual(vec![1, 1, 0, 0], 2.0);
        let parent = individual(vec![0, 0, 1, 1], 2.0);
        let other = individual(vec![0, 0, 0, 0], 2.0);

        let (winner, _) = select_population_dega_a(offspring, parent.clone(), other);
        assert_eq!(winner.bits, parent.bits);
    }

    #[test]
    fn test_dega_a_strict_comparison_decides() {
        let better = individual(vec![1, 1, 1], 3.0);
        let worse = individual(vec![1, 0, 0], 1.0);
        let other = individual(vec![0, 0, 0], 0.0);

        let (winner, _) =
            select_population_dega_a(better.clone(), worse.clone(), other.clone());
        assert_eq!(winner.fitness, 3.0);

        let (winner, _) = select_population_dega_a(worse, better, other);
        assert_eq!(winner.fitness, 3.0);
    }

    #[test]
    fn test_alter_parent_fitter_offspring_wins() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let other = individual(vec![0, 0, 0], 1.0);
        let parent = individual(vec![1, 1, 0], 2.0);
        let offspring = individual(vec![1, 1, 1], 3.0);

        let (kept_other, winner) =
            select_population_alter_parent(other.clone(), parent, offspring.clone(), &mut rng);
        assert_eq!(kept_other.bits, other.bits);
        assert_eq!(winner.bits, offspring.bits);
    }

    #[test]
    fn test_alter_parent_equal_fitness_prefers_distance() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let other = individual(vec![0, 0, 0, 0], 1.0);
        let parent = individual(vec![1, 0, 0, 0], 2.0);
        let offspring = individual(vec![1, 1, 1, 0], 2.0);

        let (_, winner) =
            select_population_alter_parent(other, parent, offspring.clone(), &mut rng);
        assert_eq!(winner.bits, offspring.bits);
    }

    #[test]
    fn test_alter_parent_exact_tie_picks_either() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let other = individual(vec![0, 0, 0, 0], 1.0);
        let parent = individual(vec![1, 1, 0, 0], 2.0);
        let offspring = individual(vec![0, 0, 1, 1], 2.0);

        let (_, winner) = select_population_alter_parent(
            other,
            parent.clone(),
            offspring.clone(),
            &mut rng,
        );
        assert!(winner.bits == parent.bits || winner.bits == offspring.bits);
    }

    #[test]
    fn test_select_population_invariant_to_argument_order() {
        // With distinct fitnesses there are no ties, so the surviving pair
        // is the same for every permutation of the arguments.
        let a = individual(vec![1, 1, 1], 3.0);
        let b = individual(vec![1, 1, 0], 2.0);
        let c = individual(vec![1, 0, 0], 1.0);

        let permutations = [
            [a.clone(), b.clone(), c.clone()],
            [a.clone(), c.clone(), b.clone()],
            [b.clone(), a.clone(), c.clone()],
            [b.clone(), c.clone(), a.clone()],
            [c.clone(), a.clone(), b.clone()],
            [c.clone(), b.clone(), a.clone()],
        ];

        for [x, y, z] in permutations {
            let mut rng = RandomNumberGenerator::from_seed(9);
            let (first, second) = select_population(x, y, z, &mut rng);
            assert_eq!((first.fitness, second.fitness), (3.0, 2.0));
        }
    }
}
