//! # Selection Primitives
//!
//! Stateless building blocks shared by the algorithm variants: biased
//! crossover and the population replacement rules. Replacement rules that
//! break ties "uniformly at random" take the caller's
//! `RandomNumberGenerator` so deterministic tests can seed them.

pub mod crossover;
pub mod replacement;

pub use crossover::biased_crossover;
pub use replacement::{
    select_population, select_population_alter_parent, select_population_dega_a,
    select_population_limit,
};
