//! Grid Evolve - genetic search for constrained grid puzzles
//!
//! Layers, bottom up:
//! - `core`: configuration, errors, shared types
//! - `ecs`: component store and entity directory used for presentation
//! - `genetics`: populations, operators and fitness objectives
//! - `simulation`: background batch scheduling and board display

pub mod core;
pub mod ecs;
pub mod genetics;
pub mod simulation;
