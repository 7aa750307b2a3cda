//! Generation stepping
//!
//! One generation:
//! 1. Carry the elite unchanged
//! 2. Fill the remaining slots with mutants, fresh random individuals and
//!    crossover children, drawn by the configured rates
//! 3. Score the new population
//! 4. Shuffle it so repeated elitism never biases the front
//!
//! The free functions work on owned or borrowed populations and an explicit
//! generator, so they run the same on the main thread and on a worker.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::core::config::EngineConfig;
use crate::genetics::fitness::FitnessKind;
use crate::genetics::individual::{random_population, Individual, Population};
use crate::genetics::operators::{mutate, recombine};
use crate::genetics::selection::{
    elite_count, elite_indices, sort_most_fit, spin_roulette, total_fitness,
};

/// Everything one batch needs, copied by value into the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvolutionParams {
    pub grid_size: usize,
    pub population_size: usize,
    pub mutation_rate: u32,
    pub random_genes_rate: u32,
    pub elite_rate: u32,
    pub generations_per_update: usize,
    pub fitness: FitnessKind,
    pub parallel_threshold: usize,
}

impl EvolutionParams {
    pub fn recombination_rate(&self) -> u32 {
        100u32.saturating_sub(self.mutation_rate + self.random_genes_rate)
    }

    pub fn elite_count(&self) -> usize {
        elite_count(self.population_size, self.elite_rate)
    }
}

impl From<&EngineConfig> for EvolutionParams {
    fn from(config: &EngineConfig) -> Self {
        Self {
            grid_size: config.grid_size,
            population_size: config.population_size,
            mutation_rate: config.mutation_rate,
            random_genes_rate: config.random_genes_rate,
            elite_rate: config.elite_rate,
            generations_per_update: config.generations_per_update,
            fitness: config.fitness_kind(),
            parallel_threshold: config.parallel_threshold,
        }
    }
}

/// Score every individual with the active objective
pub fn evaluate(population: &mut [Individual], params: &EvolutionParams) {
    let (kind, grid_size) = (params.fitness, params.grid_size);
    if population.len() > params.parallel_threshold {
        population
            .par_iter_mut()
            .for_each(|individual| individual.fitness = kind.evaluate(&individual.gene, grid_size));
    } else {
        for individual in population.iter_mut() {
            individual.fitness = kind.evaluate(&individual.gene, grid_size);
        }
    }
}

/// Fresh random population, already scored
pub fn seed_population<R: Rng + ?Sized>(params: &EvolutionParams, rng: &mut R) -> Population {
    let mut population = random_population(params.population_size, params.grid_size, rng);
    evaluate(&mut population, params);
    population
}

/// Evolve `population` by one generation; the result has the same length
pub fn step_generation<R: Rng + ?Sized>(
    population: &[Individual],
    params: &EvolutionParams,
    rng: &mut R,
) -> Population {
    debug_assert!(!population.is_empty());
    debug_assert!(params.mutation_rate <= 100 && params.random_genes_rate <= 100);
    debug_assert!(params.elite_rate <= 100);
    debug_assert!(population
        .iter()
        .all(|individual| individual.gene.len() == params.grid_size * params.grid_size));

    let target = population.len();
    let mut next = Vec::with_capacity(target);

    let elites = elite_indices(population, elite_count(target, params.elite_rate));
    next.extend(elites.iter().map(|&index| population[index].clone()));

    let total = total_fitness(population);
    let mutation = params.mutation_rate;
    let fresh = mutation + params.random_genes_rate;
    let wheel = fresh + params.recombination_rate();

    while next.len() < target {
        let roll = rng.gen_range(0..wheel);
        if roll < mutation {
            let parent = &population[spin_roulette(population, total, rng)];
            next.push(mutate(parent, params.grid_size, rng));
        } else if roll < fresh {
            next.push(Individual::random(params.grid_size, rng));
        } else {
            let first = &population[spin_roulette(population, total, rng)];
            let second = &population[spin_roulette(population, total, rng)];
            let (a, b) = recombine(first, second, rng);
            next.push(a);
            if next.len() < target {
                next.push(b);
            }
        }
    }

    evaluate(&mut next, params);
    next.shuffle(rng);
    next
}

/// Step `generations_per_update` generations
pub fn run_batch<R: Rng + ?Sized>(
    mut population: Population,
    params: &EvolutionParams,
    rng: &mut R,
) -> Population {
    for _ in 0..params.generations_per_update {
        population = step_generation(&population, params, rng);
    }
    population
}

/// Population owned by the main thread together with its generator
pub struct GeneticEngine {
    params: EvolutionParams,
    population: Population,
    rng: ChaCha8Rng,
}

impl GeneticEngine {
    pub fn new(params: EvolutionParams, seed: u64) -> Self {
        let mut engine = Self {
            params,
            population: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        engine.reset();
        engine
    }

    pub fn params(&self) -> &EvolutionParams {
        &self.params
    }

    /// Replace parameters; callers decide whether a reset is needed
    pub fn set_params(&mut self, params: EvolutionParams) {
        self.params = params;
    }

    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// Fittest individual; valid because the population is kept front-sorted
    pub fn best(&self) -> &Individual {
        &self.population[0]
    }

    /// Regenerate and score a random population for the current parameters
    pub fn reset(&mut self) {
        self.population = seed_population(&self.params, &mut self.rng);
        self.sort();
    }

    /// Copy of the population to hand to a worker
    pub fn snapshot(&self) -> Population {
        self.population.clone()
    }

    /// Take over a population evolved elsewhere
    pub fn adopt(&mut self, population: Population) {
        debug_assert_eq!(population.len(), self.population.len());
        self.population = population;
        self.sort();
    }

    /// Seed for an independent worker generator
    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Run one batch synchronously on the main generator
    pub fn step_batch(&mut self) {
        let population = std::mem::take(&mut self.population);
        self.population = run_batch(population, &self.params, &mut self.rng);
        self.sort();
    }

    fn sort(&mut self) {
        sort_most_fit(&mut self.population, self.params.elite_count());
    }
}
