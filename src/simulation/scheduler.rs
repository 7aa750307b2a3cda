//! Generation scheduler - background batches for a frame-driven caller
//!
//! States:
//! - `Idle`: nothing in flight. Each `frame()` starts a batch unless paused
//!   or the update limit is reached.
//! - `Computing`: one blocking worker evolves a by-value snapshot of the
//!   population with its own generator. `frame()` polls for the result
//!   without blocking and adopts it.
//!
//! Parameter changes that invalidate the population (grid size, population
//! size, objective) reset it immediately. A batch already in flight keeps
//! running; its result is discarded when it arrives.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::core::config::AppConfig;
use crate::core::error::{EvolveError, Result};
use crate::genetics::engine::{run_batch, EvolutionParams, GeneticEngine};
use crate::genetics::fitness::FitnessKind;
use crate::genetics::history::FitnessHistory;
use crate::genetics::individual::{Individual, Population};
use crate::simulation::pacing::{BatchPacer, Stopwatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Computing,
}

/// What a worker hands back
struct BatchResult {
    population: Population,
    generations: usize,
    elapsed: Duration,
    slept: Duration,
}

pub struct GenerationScheduler {
    runtime: Handle,
    engine: GeneticEngine,
    history: FitnessHistory,
    heat: Vec<i32>,
    update_limit: usize,
    updates_completed: usize,
    generations_completed: usize,
    paused: bool,
    /// Raised by a reset while a batch is in flight; the batch's result is dropped
    discard_pending: bool,
    in_flight: Option<oneshot::Receiver<BatchResult>>,
    pacer: BatchPacer,
    /// Unpaused time spent on the current run
    clock: Stopwatch,
    solved_logged: bool,
    worker_failures: usize,
}

impl GenerationScheduler {
    /// Build the engine from validated configuration and seed its population
    pub fn new(config: &AppConfig, runtime: Handle) -> Self {
        let seed = config.engine.seed.unwrap_or_else(rand::random);
        let params = EvolutionParams::from(&config.engine);
        let update_limit = config.engine.update_limit;

        let mut scheduler = Self {
            runtime,
            engine: GeneticEngine::new(params, seed),
            history: FitnessHistory::new(update_limit),
            heat: Vec::new(),
            update_limit,
            updates_completed: 0,
            generations_completed: 0,
            paused: false,
            discard_pending: false,
            in_flight: None,
            pacer: BatchPacer::new(config.window.frame_rate, config.window.pace_batches),
            clock: Stopwatch::new(),
            solved_logged: false,
            worker_failures: 0,
        };
        scheduler.refresh_heat();

        tracing::info!(
            "Scheduler ready: {} on {}x{} grid, population {}, seed {}",
            params.fitness.name(),
            params.grid_size,
            params.grid_size,
            params.population_size,
            seed
        );
        scheduler
    }

    pub fn state(&self) -> SchedulerState {
        if self.in_flight.is_some() {
            SchedulerState::Computing
        } else {
            SchedulerState::Idle
        }
    }

    /// Per-frame tick: adopt a finished batch, then start the next one
    ///
    /// Returns true when a batch was adopted this frame.
    pub fn frame(&mut self) -> bool {
        let adopted = self.poll_batch();
        if self.can_start_batch() {
            self.start_batch();
        }
        adopted
    }

    /// Non-blocking check for the in-flight batch
    pub fn poll_batch(&mut self) -> bool {
        let Some(receiver) = self.in_flight.as_mut() else {
            return false;
        };

        match receiver.try_recv() {
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Closed) => {
                self.in_flight = None;
                self.discard_pending = false;
                self.worker_failures += 1;
                tracing::error!("Generation worker exited without a result");
                false
            }
            Ok(result) => {
                self.in_flight = None;
                if self.discard_pending {
                    self.discard_pending = false;
                    tracing::debug!("Discarded stale batch after reset");
                    return false;
                }
                self.apply(result);
                true
            }
        }
    }

    /// Block until the in-flight batch (if any) has been adopted or discarded
    pub fn drain(&mut self) {
        while self.in_flight.is_some() {
            if !self.poll_batch() && self.in_flight.is_some() {
                std::thread::sleep(Duration::from_millis(1));
            }
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop starting new batches; a batch in flight still completes
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.clock.toggle_pause();
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.clock.toggle_pause();
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Ignore the result of the batch currently in flight
    pub fn discard_in_flight(&mut self) {
        if self.in_flight.is_some() {
            self.discard_pending = true;
        }
    }

    /// Fresh population, zeroed counter and history
    pub fn reset(&mut self) {
        self.discard_in_flight();
        self.engine.reset();
        self.refresh_heat();
        self.history.reset(self.update_limit);
        self.updates_completed = 0;
        self.generations_completed = 0;
        self.solved_logged = false;
        self.clock.restart();

        let params = self.engine.params();
        tracing::info!(
            "Reset: {} on {}x{} grid, population {}",
            params.fitness.name(),
            params.grid_size,
            params.grid_size,
            params.population_size
        );
    }

    pub fn set_grid_size(&mut self, grid_size: usize) {
        debug_assert!(grid_size > 0);
        self.update_params(|params| params.grid_size = grid_size);
        self.reset();
    }

    pub fn set_population_size(&mut self, population_size: usize) {
        debug_assert!(population_size > 0);
        self.update_params(|params| params.population_size = population_size);
        self.reset();
    }

    pub fn set_fitness(&mut self, fitness: FitnessKind) {
        self.update_params(|params| params.fitness = fitness);
        self.reset();
    }

    /// New operator rates, picked up by the next batch
    pub fn set_rates(&mut self, mutation_rate: u32, random_genes_rate: u32, elite_rate: u32) {
        debug_assert!(mutation_rate <= 100 && random_genes_rate <= 100 && elite_rate <= 100);
        self.update_params(|params| {
            params.mutation_rate = mutation_rate;
            params.random_genes_rate = random_genes_rate;
            params.elite_rate = elite_rate;
        });
    }

    pub fn set_generations_per_update(&mut self, generations: usize) {
        debug_assert!(generations > 0);
        self.update_params(|params| params.generations_per_update = generations);
    }

    pub fn params(&self) -> &EvolutionParams {
        self.engine.params()
    }

    pub fn population(&self) -> &[Individual] {
        self.engine.population()
    }

    pub fn best(&self) -> &Individual {
        self.engine.best()
    }

    /// Per-cell heat of the best individual
    pub fn heat(&self) -> &[i32] {
        &self.heat
    }

    pub fn history(&self) -> &FitnessHistory {
        &self.history
    }

    pub fn updates_completed(&self) -> usize {
        self.updates_completed
    }

    pub fn update_limit(&self) -> usize {
        self.update_limit
    }

    /// Generations stepped by every adopted batch since the last reset
    pub fn generations_completed(&self) -> usize {
        self.generations_completed
    }

    /// Update limit reached; no more batches will start
    pub fn is_finished(&self) -> bool {
        self.updates_completed >= self.update_limit
    }

    /// Best individual scores the objective's optimum
    pub fn is_solved(&self) -> bool {
        let params = self.params();
        self.best().fitness >= params.fitness.optimum(params.grid_size)
    }

    /// Batches lost to a worker that died before sending
    pub fn worker_failures(&self) -> usize {
        self.worker_failures
    }

    /// Unpaused wall time since the last reset
    pub fn evolving_time(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Error out if any worker died since construction
    pub fn check_workers(&self) -> Result<()> {
        if self.worker_failures > 0 {
            return Err(EvolveError::WorkerFailed(format!(
                "{} batch(es) ended without a result",
                self.worker_failures
            )));
        }
        Ok(())
    }

    fn can_start_batch(&self) -> bool {
        !self.paused && self.in_flight.is_none() && !self.is_finished()
    }

    fn start_batch(&mut self) {
        debug_assert!(self.in_flight.is_none(), "only one batch may be in flight");

        let (sender, receiver) = oneshot::channel();
        let population = self.engine.snapshot();
        let params = *self.engine.params();
        let seed = self.engine.next_seed();
        let pacer = self.pacer;

        self.runtime.spawn_blocking(move || {
            let started = Instant::now();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let population = run_batch(population, &params, &mut rng);
            let elapsed = started.elapsed();
            let slept = pacer.throttle(started);
            // Receiver is gone only if the scheduler was dropped
            let _ = sender.send(BatchResult {
                population,
                generations: params.generations_per_update,
                elapsed,
                slept,
            });
        });

        self.in_flight = Some(receiver);
    }

    fn apply(&mut self, result: BatchResult) {
        self.engine.adopt(result.population);
        self.refresh_heat();
        self.history.record(self.engine.population());
        self.updates_completed += 1;
        self.generations_completed += result.generations;

        tracing::debug!(
            "Adopted batch {}/{}: best {} in {:?} (paced {:?})",
            self.updates_completed,
            self.update_limit,
            self.best().fitness,
            result.elapsed,
            result.slept
        );

        if !self.solved_logged && self.is_solved() {
            self.solved_logged = true;
            tracing::info!(
                "Solved after {} generations ({:.2?})",
                self.generations_completed(),
                self.evolving_time()
            );
        }
    }

    fn refresh_heat(&mut self) {
        let params = self.engine.params();
        self.heat = params.fitness.heat(&self.engine.best().gene, params.grid_size);
    }

    fn update_params(&mut self, change: impl FnOnce(&mut EvolutionParams)) {
        let mut params = *self.engine.params();
        change(&mut params);
        self.engine.set_params(params);
    }
}
