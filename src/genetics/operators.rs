//! Variation operators
//!
//! Offspring come back unevaluated (fitness 0); the generation step scores the
//! whole population at once.

use rand::Rng;

use crate::genetics::individual::{random_allele, Individual};

/// Clone `parent` and overwrite one random locus with a random symbol
pub fn mutate<R: Rng + ?Sized>(parent: &Individual, grid_size: usize, rng: &mut R) -> Individual {
    debug_assert!(!parent.gene.is_empty());
    let mut child = Individual::new(parent.gene.clone());
    let locus = rng.gen_range(0..child.gene.len());
    child.gene[locus] = random_allele(grid_size, rng);
    child
}

/// Swap the gene tails of two parents starting at `point`
pub fn crossover(first: &Individual, second: &Individual, point: usize) -> (Individual, Individual) {
    debug_assert_eq!(first.gene.len(), second.gene.len());
    debug_assert!(point <= first.gene.len());

    let mut a = Individual::new(first.gene.clone());
    let mut b = Individual::new(second.gene.clone());
    a.gene[point..].swap_with_slice(&mut b.gene[point..]);
    (a, b)
}

/// Crossover at a uniform point in `[0, len / 2]`
pub fn recombine<R: Rng + ?Sized>(
    first: &Individual,
    second: &Individual,
    rng: &mut R,
) -> (Individual, Individual) {
    let point = rng.gen_range(0..=first.gene.len() / 2);
    crossover(first, second, point)
}
