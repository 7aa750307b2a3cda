//! Driving the genetic engine from a frame loop
//!
//! `scheduler` runs batches off the frame thread, `pacing` keeps them in step
//! with the display rate, and `display` turns the best grid into draw calls.

pub mod display;
pub mod pacing;
pub mod scheduler;

pub use display::{heat_color, GridDisplay, CELL_TAG};
pub use pacing::{BatchPacer, Stopwatch};
pub use scheduler::{GenerationScheduler, SchedulerState};
