//! Per-update fitness history for plotting

use serde::{Deserialize, Serialize};

use crate::genetics::individual::Individual;
use crate::genetics::selection::{average_fitness, min_max_fitness};

/// Three parallel series, one entry per adopted batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessHistory {
    pub max: Vec<i64>,
    pub min: Vec<i64>,
    pub avg: Vec<f64>,
    capacity: usize,
}

impl FitnessHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            max: Vec::with_capacity(capacity),
            min: Vec::with_capacity(capacity),
            avg: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.max.len()
    }

    pub fn is_empty(&self) -> bool {
        self.max.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    pub fn push(&mut self, max: i64, min: i64, avg: f64) {
        debug_assert!(!self.is_full(), "history holds at most {} entries", self.capacity);
        self.max.push(max);
        self.min.push(min);
        self.avg.push(avg);
    }

    /// Append the statistics of `population`
    pub fn record(&mut self, population: &[Individual]) {
        let (min, max) = min_max_fitness(population);
        self.push(max, min, average_fitness(population));
    }

    /// Drop every entry and resize for a new run
    pub fn reset(&mut self, capacity: usize) {
        *self = Self::new(capacity);
    }

    /// Most recent (max, min, avg), if any
    pub fn latest(&self) -> Option<(i64, i64, f64)> {
        let last = self.len().checked_sub(1)?;
        Some((self.max[last], self.min[last], self.avg[last]))
    }
}
