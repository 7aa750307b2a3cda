//! Grid Evolve - headless driver
//!
//! Runs the generation scheduler from a paced frame loop until the grid is
//! solved, the update limit is reached or the frame budget runs out, then
//! prints the best grid and optionally dumps the fitness history.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use grid_evolve::core::config::AppConfig;
use grid_evolve::core::error::Result;
use grid_evolve::core::types::{Color, Frame};
use grid_evolve::ecs::components::{Animation, Shape, Text, Transform};
use grid_evolve::ecs::draw::Canvas;
use grid_evolve::simulation::{BatchPacer, GenerationScheduler, GridDisplay, Stopwatch};

/// Grid Evolve - genetic search for constrained grid puzzles
#[derive(Parser, Debug)]
#[command(name = "grid-evolve")]
#[command(about = "Evolve N×N symbol grids toward a chosen objective")]
struct Args {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid edge length N
    #[arg(long)]
    grid_size: Option<usize>,

    /// Individuals per generation
    #[arg(long)]
    population: Option<usize>,

    /// Objective index: 0 grid constraint, 1 alternating, 2 maximize, 3 minimize, 4 distance to center
    #[arg(long)]
    fitness: Option<usize>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many frames (0 = until solved or the update limit)
    #[arg(long, default_value_t = 0)]
    frames: Frame,

    /// Let batches run as fast as they finish
    #[arg(long)]
    no_pacing: bool,

    /// Write the fitness history as JSON to this path
    #[arg(long)]
    history_out: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(grid_size) = self.grid_size {
            config.engine.grid_size = grid_size;
        }
        if let Some(population) = self.population {
            config.engine.population_size = population;
        }
        if let Some(fitness) = self.fitness {
            config.engine.fitness_index = fitness;
        }
        if self.seed.is_some() {
            config.engine.seed = self.seed;
        }
        if self.no_pacing {
            config.window.pace_batches = false;
        }
    }
}

/// Collects painted cells and prints them as a text grid
struct TerminalCanvas {
    cell_size: f32,
    grid_size: usize,
    labels: Vec<String>,
    hot: Vec<bool>,
}

impl TerminalCanvas {
    fn new(board_extent: f32, grid_size: usize) -> Self {
        Self {
            cell_size: board_extent / grid_size as f32,
            grid_size,
            labels: vec![String::new(); grid_size * grid_size],
            hot: vec![false; grid_size * grid_size],
        }
    }

    fn slot(&self, transform: &Transform) -> Option<usize> {
        let col = (transform.pos.x / self.cell_size) as usize;
        let row = (transform.pos.y / self.cell_size) as usize;
        (row < self.grid_size && col < self.grid_size).then_some(row * self.grid_size + col)
    }

    fn render(&self) -> String {
        let width = self.labels.iter().map(String::len).max().unwrap_or(1);
        let mut out = String::new();
        for row in 0..self.grid_size {
            for col in 0..self.grid_size {
                let index = row * self.grid_size + col;
                let marker = if self.hot[index] { '*' } else { ' ' };
                out.push_str(&format!("{:>width$}{} ", self.labels[index], marker));
            }
            out.push('\n');
        }
        out
    }
}

impl Canvas for TerminalCanvas {
    fn draw_sprite(&mut self, _transform: &Transform, _animation: &Animation) {}

    fn draw_shape(&mut self, transform: &Transform, shape: &Shape) {
        if let Some(index) = self.slot(transform) {
            self.hot[index] = shape.fill != Color::WHITE;
        }
    }

    fn draw_text(&mut self, transform: &Transform, text: &Text) {
        if let Some(index) = self.slot(transform) {
            self.labels[index] = text.content.clone();
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("grid_evolve=info")),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;

    let runtime = Runtime::new()?;
    let mut scheduler = GenerationScheduler::new(&config, runtime.handle().clone());
    let frame_pacer = BatchPacer::new(config.window.frame_rate, config.window.pace_batches);
    let mut progress = Stopwatch::with_limit(Duration::from_secs(1));
    let mut frames: Frame = 0;

    loop {
        let started = Instant::now();
        scheduler.frame();
        frames += 1;

        if progress.time_ran_out() {
            if let Some((max, min, avg)) = scheduler.history().latest() {
                tracing::info!(
                    "Update {}/{}: max {} min {} avg {:.1}",
                    scheduler.updates_completed(),
                    scheduler.update_limit(),
                    max,
                    min,
                    avg
                );
            }
            progress.restart();
        }

        if scheduler.is_solved() || scheduler.is_finished() {
            break;
        }
        if args.frames > 0 && frames >= args.frames {
            tracing::info!("Frame budget of {} exhausted", args.frames);
            break;
        }

        if frame_pacer.throttle(started).is_zero() {
            std::thread::yield_now();
        }
    }

    scheduler.pause();
    scheduler.drain();
    scheduler.check_workers()?;

    let params = *scheduler.params();
    let best = scheduler.best().clone();
    let heat = scheduler.heat().to_vec();

    let mut display = GridDisplay::for_window(&config.window)?;
    let mut canvas = TerminalCanvas::new(display.board_extent(), params.grid_size);
    display.paint(&best.gene, &heat, params.grid_size, &mut canvas);

    println!(
        "{} after {} generations ({:.2?}): fitness {} of {}",
        params.fitness.name(),
        scheduler.generations_completed(),
        scheduler.evolving_time(),
        best.fitness,
        params.fitness.optimum(params.grid_size)
    );
    print!("{}", canvas.render());

    if let Some(path) = &args.history_out {
        let json = serde_json::to_string_pretty(scheduler.history())?;
        std::fs::write(path, json)?;
        tracing::info!("Wrote fitness history to {}", path.display());
    }

    Ok(())
}
