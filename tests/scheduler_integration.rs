//! Integration tests for the generation scheduler
//!
//! Each test owns a tokio runtime and drives the scheduler frame by frame,
//! the way the headless driver does.

use std::time::Duration;

use grid_evolve::core::config::{AppConfig, EngineConfig, WindowConfig};
use grid_evolve::genetics::FitnessKind;
use grid_evolve::simulation::{GenerationScheduler, SchedulerState};
use tokio::runtime::Runtime;

fn config(grid_size: usize, fitness_index: usize) -> AppConfig {
    AppConfig {
        window: WindowConfig {
            pace_batches: false,
            ..WindowConfig::default()
        },
        engine: EngineConfig {
            grid_size,
            population_size: 40,
            generations_per_update: 5,
            update_limit: 20,
            fitness_index,
            seed: Some(2024),
            ..EngineConfig::default()
        },
    }
}

fn run_to_completion(scheduler: &mut GenerationScheduler) {
    while !scheduler.is_finished() {
        scheduler.frame();
        std::thread::sleep(Duration::from_millis(1));
    }
    scheduler.drain();
}

#[test]
fn test_history_grows_one_entry_per_update() {
    let runtime = Runtime::new().unwrap();
    let mut scheduler = GenerationScheduler::new(&config(4, 2), runtime.handle().clone());
    run_to_completion(&mut scheduler);

    let history = scheduler.history();
    assert_eq!(history.len(), 20);
    assert_eq!(history.min.len(), 20);
    assert_eq!(history.avg.len(), 20);
    for i in 0..history.len() {
        assert!(history.min[i] as f64 <= history.avg[i]);
        assert!(history.avg[i] <= history.max[i] as f64);
    }
    // Elitism never loses the best
    assert!(history.max.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(scheduler.best().fitness, *history.max.last().unwrap());
}

#[test]
fn test_discard_mid_batch_leaves_population_untouched() {
    let runtime = Runtime::new().unwrap();
    let mut scheduler = GenerationScheduler::new(&config(9, 0), runtime.handle().clone());
    scheduler.frame();
    assert_eq!(scheduler.state(), SchedulerState::Computing);

    let before = scheduler.population().to_vec();
    scheduler.discard_in_flight();
    scheduler.pause();
    scheduler.drain();

    assert_eq!(scheduler.state(), SchedulerState::Idle);
    assert_eq!(scheduler.population(), before.as_slice());
    assert_eq!(scheduler.updates_completed(), 0);
    assert!(scheduler.history().is_empty());
}

#[test]
fn test_pause_lets_in_flight_batch_finish() {
    let runtime = Runtime::new().unwrap();
    let mut scheduler = GenerationScheduler::new(&config(4, 2), runtime.handle().clone());
    scheduler.frame();
    scheduler.pause();
    assert!(scheduler.is_paused());

    scheduler.drain();
    assert_eq!(scheduler.updates_completed(), 1);

    for _ in 0..5 {
        scheduler.frame();
    }
    assert_eq!(scheduler.state(), SchedulerState::Idle);
    assert_eq!(scheduler.updates_completed(), 1);

    scheduler.toggle_pause();
    scheduler.frame();
    assert_eq!(scheduler.state(), SchedulerState::Computing);
    scheduler.drain();
    assert_eq!(scheduler.updates_completed(), 2);
}

#[test]
fn test_objective_change_resets_run() {
    let runtime = Runtime::new().unwrap();
    let mut scheduler = GenerationScheduler::new(&config(4, 2), runtime.handle().clone());
    for _ in 0..3 {
        scheduler.frame();
        scheduler.drain();
    }
    assert_eq!(scheduler.updates_completed(), 3);

    scheduler.set_fitness(FitnessKind::Minimize);
    assert_eq!(scheduler.updates_completed(), 0);
    assert!(scheduler.history().is_empty());
    for individual in scheduler.population() {
        assert_eq!(individual.fitness, FitnessKind::Minimize.evaluate(&individual.gene, 4));
    }
}

#[test]
fn test_grid_size_change_regenerates_genes() {
    let runtime = Runtime::new().unwrap();
    let mut scheduler = GenerationScheduler::new(&config(4, 2), runtime.handle().clone());
    scheduler.frame();
    scheduler.set_grid_size(9);
    scheduler.drain();

    assert_eq!(scheduler.updates_completed(), 0);
    assert!(scheduler
        .population()
        .iter()
        .all(|individual| individual.gene.len() == 81));
    assert_eq!(scheduler.heat().len(), 81);
}

#[test]
fn test_generations_per_update_applies_to_next_batch() {
    let runtime = Runtime::new().unwrap();
    let mut scheduler = GenerationScheduler::new(&config(4, 2), runtime.handle().clone());
    scheduler.set_generations_per_update(7);
    scheduler.frame();
    scheduler.drain();
    assert_eq!(scheduler.updates_completed(), 1);
    assert_eq!(scheduler.generations_completed(), 7);
}

#[test]
fn test_small_maximize_run_gets_solved() {
    let runtime = Runtime::new().unwrap();
    let mut config = config(3, 2);
    config.engine.update_limit = 400;
    let mut scheduler = GenerationScheduler::new(&config, runtime.handle().clone());

    while !scheduler.is_solved() && !scheduler.is_finished() {
        scheduler.frame();
        scheduler.drain();
    }
    assert!(scheduler.is_solved());
    assert!(scheduler.check_workers().is_ok());
}
