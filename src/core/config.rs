//! Solver configuration with documented defaults
//!
//! Values arrive from a TOML file (or the command line) and are validated
//! once, up front. Engine code downstream assumes a validated config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{EvolveError, Result};
use crate::genetics::fitness::{self, FitnessKind};

/// Largest supported grid edge
///
/// Symbols are stored as byte-sized alleles and painted as 1-2 digit labels.
pub const MAX_GRID_SIZE: usize = 36;

/// Top-level configuration file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub engine: EngineConfig,
}

/// Presentation settings the engine cares about
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,

    /// Target display refresh rate (frames per second)
    ///
    /// Also used as the pacing hint for background batches: a batch that
    /// finishes faster than one frame period sleeps for the remainder.
    pub frame_rate: u32,

    /// Whether background batches are throttled to the frame period
    pub pace_batches: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 576,
            frame_rate: 60,
            pace_batches: true,
        }
    }
}

/// Genetic algorithm parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === GRID ===
    /// Edge length N of the grid; genes hold N² cells with symbols 0..N
    ///
    /// The grid-constraint objective needs N to be a perfect square
    /// (1, 4, 9, 16, 25, 36) so the grid splits into √N × √N boxes.
    pub grid_size: usize,

    // === POPULATION ===
    /// Number of individuals evolved together
    pub population_size: usize,

    /// Percent chance that a filled slot is a mutated clone of one parent
    pub mutation_rate: u32,

    /// Percent chance that a filled slot is a brand new random individual
    ///
    /// Whatever `mutation_rate + random_genes_rate` leaves of 100 is the
    /// recombination rate.
    pub random_genes_rate: u32,

    /// Percent of the population carried unchanged into the next generation
    pub elite_rate: u32,

    // === SCHEDULING ===
    /// Generations stepped by one background batch
    pub generations_per_update: usize,

    /// Maximum number of adopted batches; bounds the history buffers
    pub update_limit: usize,

    // === OBJECTIVE ===
    /// Index into the fitness registry
    pub fitness_index: usize,

    /// Seed for the main-thread generator (entropy when absent)
    pub seed: Option<u64>,

    /// Population size above which fitness evaluation runs on rayon
    ///
    /// Small populations are faster to score on one thread.
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: 9,
            population_size: 100,
            mutation_rate: 20,
            random_genes_rate: 5,
            elite_rate: 10,
            generations_per_update: 10,
            update_limit: 1000,
            fitness_index: 0,
            seed: None,
            parallel_threshold: 512,
        }
    }
}

impl EngineConfig {
    /// Recombination share implied by the other two rates
    pub fn recombination_rate(&self) -> u32 {
        100u32.saturating_sub(self.mutation_rate + self.random_genes_rate)
    }

    pub fn fitness_kind(&self) -> FitnessKind {
        FitnessKind::from_index(self.fitness_index)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            return Err(EvolveError::InvalidConfig(format!(
                "grid_size ({}) must be within 1..={}",
                self.grid_size, MAX_GRID_SIZE
            )));
        }

        if self.population_size == 0 {
            return Err(EvolveError::InvalidConfig(
                "population_size must be positive".into(),
            ));
        }

        for (name, rate) in [
            ("mutation_rate", self.mutation_rate),
            ("random_genes_rate", self.random_genes_rate),
            ("elite_rate", self.elite_rate),
        ] {
            if rate > 100 {
                return Err(EvolveError::InvalidConfig(format!(
                    "{} ({}) must be a percentage in 0..=100",
                    name, rate
                )));
            }
        }

        if self.generations_per_update == 0 || self.update_limit == 0 {
            return Err(EvolveError::InvalidConfig(
                "generations_per_update and update_limit must be positive".into(),
            ));
        }

        if self.fitness_index >= fitness::REGISTRY.len() {
            return Err(EvolveError::InvalidConfig(format!(
                "fitness_index ({}) must be below {}",
                self.fitness_index,
                fitness::REGISTRY.len()
            )));
        }

        if self.fitness_kind() == FitnessKind::GridConstraint
            && fitness::box_size(self.grid_size).is_none()
        {
            return Err(EvolveError::InvalidConfig(format!(
                "grid_size ({}) must be a perfect square for the grid-constraint objective",
                self.grid_size
            )));
        }

        Ok(())
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.frame_rate == 0 {
            return Err(EvolveError::InvalidConfig(
                "window.frame_rate must be positive".into(),
            ));
        }
        self.engine.validate()
    }
}
