//! Selection helpers: fitness statistics, elitism and roulette wheel

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rand::Rng;

use crate::genetics::individual::Individual;

pub fn total_fitness(population: &[Individual]) -> i64 {
    population.iter().map(|individual| individual.fitness).sum()
}

/// (min, max) fitness in one pass
pub fn min_max_fitness(population: &[Individual]) -> (i64, i64) {
    debug_assert!(!population.is_empty());
    population
        .iter()
        .fold((i64::MAX, i64::MIN), |(min, max), individual| {
            (min.min(individual.fitness), max.max(individual.fitness))
        })
}

pub fn average_fitness(population: &[Individual]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    total_fitness(population) as f64 / population.len() as f64
}

/// `ceil(population_size * elite_rate / 100)`
pub fn elite_count(population_size: usize, elite_rate: u32) -> usize {
    debug_assert!(elite_rate <= 100);
    (population_size * elite_rate as usize).div_ceil(100)
}

/// Indices of the `count` fittest individuals, in no particular order
///
/// Keeps a min-heap of at most `count` (fitness, index) pairs, so ties are
/// resolved arbitrarily.
pub fn elite_indices(population: &[Individual], count: usize) -> Vec<usize> {
    let count = count.min(population.len());
    if count == 0 {
        return Vec::new();
    }

    let mut heap = BinaryHeap::with_capacity(count + 1);
    for (index, individual) in population.iter().enumerate() {
        if heap.len() < count {
            heap.push(Reverse((individual.fitness, index)));
        } else if let Some(&Reverse((weakest, _))) = heap.peek() {
            if individual.fitness > weakest {
                heap.pop();
                heap.push(Reverse((individual.fitness, index)));
            }
        }
    }

    heap.into_iter().map(|Reverse((_, index))| index).collect()
}

/// Move the `count` fittest individuals to the front, fittest first
///
/// The tail stays unordered. Index 0 always ends up holding the maximum.
pub fn sort_most_fit(population: &mut [Individual], count: usize) {
    if population.is_empty() {
        return;
    }
    let count = count.clamp(1, population.len());
    let fitter = |a: &Individual, b: &Individual| -> Ordering { b.fitness.cmp(&a.fitness) };

    if count < population.len() {
        population.select_nth_unstable_by(count - 1, fitter);
    }
    population[..count].sort_unstable_by(fitter);
}

/// Walk cumulative fitness until it exceeds `pick`
///
/// A pick of 0 lands on the first individual with positive fitness. When the
/// wheel is empty (all zero) index 0 is returned; a pick at the very end of
/// the wheel lands on the last positive individual.
pub fn roulette_select(population: &[Individual], pick: i64) -> usize {
    debug_assert!(!population.is_empty());
    debug_assert!(pick >= 0);

    let mut cumulative = 0;
    let mut last_positive = 0;
    for (index, individual) in population.iter().enumerate() {
        debug_assert!(individual.fitness >= 0, "roulette needs non-negative fitness");
        if individual.fitness > 0 {
            cumulative += individual.fitness;
            last_positive = index;
            if cumulative > pick {
                return index;
            }
        }
    }
    last_positive
}

/// Roulette selection with a uniform pick in `[0, total]`
pub fn spin_roulette<R: Rng + ?Sized>(population: &[Individual], total: i64, rng: &mut R) -> usize {
    let pick = if total > 0 { rng.gen_range(0..=total) } else { 0 };
    roulette_select(population, pick)
}
