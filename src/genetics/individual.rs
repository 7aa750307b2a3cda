//! Individuals - one candidate grid plus its score

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Symbol stored in one grid cell, always below the grid size
pub type Allele = u8;

/// A candidate grid in row-major order (N² alleles) and its fitness
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    pub gene: Vec<Allele>,
    pub fitness: i64,
}

pub type Population = Vec<Individual>;

impl Individual {
    /// Wrap a gene; fitness stays 0 until the population is evaluated
    pub fn new(gene: Vec<Allele>) -> Self {
        Self { gene, fitness: 0 }
    }

    /// Uniformly random grid of edge `grid_size`
    pub fn random<R: Rng + ?Sized>(grid_size: usize, rng: &mut R) -> Self {
        debug_assert!(grid_size > 0);
        let gene = (0..grid_size * grid_size)
            .map(|_| random_allele(grid_size, rng))
            .collect();
        Self::new(gene)
    }

    /// Value at row `row`, column `col`
    pub fn at(&self, grid_size: usize, row: usize, col: usize) -> Allele {
        self.gene[row * grid_size + col]
    }
}

pub fn random_allele<R: Rng + ?Sized>(grid_size: usize, rng: &mut R) -> Allele {
    debug_assert!(
        grid_size <= Allele::MAX as usize + 1,
        "grid size {} has symbols beyond an allele",
        grid_size
    );
    rng.gen_range(0..grid_size) as Allele
}

/// `size` fresh random individuals, unevaluated
pub fn random_population<R: Rng + ?Sized>(
    size: usize,
    grid_size: usize,
    rng: &mut R,
) -> Population {
    (0..size).map(|_| Individual::random(grid_size, rng)).collect()
}
