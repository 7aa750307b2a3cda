//! Genetic algorithm over candidate grids
//!
//! Individuals are row-major grids of symbols. Objectives live in the
//! `fitness` registry; `engine` owns the generation step.

pub mod engine;
pub mod fitness;
pub mod history;
pub mod individual;
pub mod operators;
pub mod selection;

pub use engine::{run_batch, seed_population, step_generation, EvolutionParams, GeneticEngine};
pub use fitness::{FitnessKind, REGISTRY};
pub use history::FitnessHistory;
pub use individual::{Allele, Individual, Population};
