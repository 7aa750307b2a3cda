//! Objective registry
//!
//! Every objective scores a row-major gene of edge N (symbols 0..N) with a
//! non-negative integer, higher is better. Each one also has a heat function
//! that the presentation layer uses to colour cells.

use serde::{Deserialize, Serialize};

use crate::genetics::individual::Allele;

/// Objectives in registry order; the config selects one by index
pub const REGISTRY: [FitnessKind; 5] = [
    FitnessKind::GridConstraint,
    FitnessKind::Alternating,
    FitnessKind::Maximize,
    FitnessKind::Minimize,
    FitnessKind::DistanceToCenter,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FitnessKind {
    /// Sudoku rules: every row, column and box holds each symbol once
    GridConstraint,
    /// Checkerboard of highest and lowest symbols
    Alternating,
    Maximize,
    Minimize,
    /// Values equal to the cell's Manhattan distance from the grid centre
    DistanceToCenter,
}

impl FitnessKind {
    /// Registry lookup; panics on an index that config validation would reject
    pub fn from_index(index: usize) -> Self {
        REGISTRY[index]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            FitnessKind::GridConstraint => "Sudoku",
            FitnessKind::Alternating => "Checkers",
            FitnessKind::Maximize => "Maximize",
            FitnessKind::Minimize => "Minimize",
            FitnessKind::DistanceToCenter => "Distance to center",
        }
    }

    pub fn evaluate(self, gene: &[Allele], grid_size: usize) -> i64 {
        debug_assert_eq!(gene.len(), grid_size * grid_size);
        match self {
            FitnessKind::GridConstraint => grid_constraint(gene, grid_size),
            FitnessKind::Alternating => alternating(gene, grid_size),
            FitnessKind::Maximize => gene.iter().map(|&v| v as i64).sum(),
            FitnessKind::Minimize => {
                let top = grid_size as i64 - 1;
                gene.iter().map(|&v| top - v as i64).sum()
            }
            FitnessKind::DistanceToCenter => distance_to_center(gene, grid_size),
        }
    }

    /// Per-cell presentation heat, same length as the gene
    pub fn heat(self, gene: &[Allele], grid_size: usize) -> Vec<i32> {
        match self {
            FitnessKind::GridConstraint => grid_constraint_heat(gene, grid_size),
            _ => gene.iter().map(|&v| v as i32).collect(),
        }
    }

    /// Best achievable score for edge `grid_size`
    pub fn optimum(self, grid_size: usize) -> i64 {
        let n = grid_size as i64;
        match self {
            FitnessKind::GridConstraint => 3 * n * n,
            FitnessKind::Alternating | FitnessKind::Maximize | FitnessKind::Minimize => {
                n * n * (n - 1)
            }
            FitnessKind::DistanceToCenter => n * n * n,
        }
    }
}

/// Edge of one box when `grid_size` is a perfect square
pub fn box_size(grid_size: usize) -> Option<usize> {
    let root = (grid_size as f64).sqrt().round() as usize;
    (root * root == grid_size).then_some(root)
}

fn grid_constraint(gene: &[Allele], n: usize) -> i64 {
    let b = box_size(n).unwrap_or(1);
    debug_assert_eq!(b * b, n, "grid-constraint objective needs a perfect-square grid");

    let mut counts = vec![0u32; n];
    let mut score = 0;
    for unit in 0..n {
        score += unique_symbols(&mut counts, (0..n).map(|col| gene[unit * n + col]));
        score += unique_symbols(&mut counts, (0..n).map(|row| gene[row * n + unit]));

        let (top, left) = ((unit / b) * b, (unit % b) * b);
        score += unique_symbols(
            &mut counts,
            (0..n).map(|k| gene[(top + k / b) * n + left + k % b]),
        );
    }
    score
}

/// Number of symbols occurring exactly once among `cells`
fn unique_symbols(counts: &mut [u32], cells: impl Iterator<Item = Allele>) -> i64 {
    counts.fill(0);
    for value in cells {
        counts[value as usize] += 1;
    }
    counts.iter().filter(|&&count| count == 1).count() as i64
}

/// Collisions of each cell's symbol within its row, column and box
fn grid_constraint_heat(gene: &[Allele], n: usize) -> Vec<i32> {
    let b = box_size(n).unwrap_or(1);
    let mut rows = vec![0i32; n * n];
    let mut cols = vec![0i32; n * n];
    let mut boxes = vec![0i32; n * n];

    let box_of = |row: usize, col: usize| (row / b) * b + col / b;

    for row in 0..n {
        for col in 0..n {
            let value = gene[row * n + col] as usize;
            rows[row * n + value] += 1;
            cols[col * n + value] += 1;
            boxes[box_of(row, col) * n + value] += 1;
        }
    }

    let ceiling = n as i32 - 1;
    (0..n * n)
        .map(|cell| {
            let (row, col) = (cell / n, cell % n);
            let value = gene[cell] as usize;
            let seen = rows[row * n + value]
                + cols[col * n + value]
                + boxes[box_of(row, col) * n + value];
            (seen - 3).clamp(0, ceiling)
        })
        .collect()
}

/// Row-major walk scoring high symbols on "high" cells and low symbols elsewhere
///
/// For even N the flag flips once more at every row end, so cell (r, c) is
/// high exactly when r + c is even.
fn alternating(gene: &[Allele], n: usize) -> i64 {
    let top = n as i64 - 1;
    let mut high = true;
    let mut score = 0;
    for row in gene.chunks(n) {
        for &value in row {
            score += if high { value as i64 } else { top - value as i64 };
            high = !high;
        }
        if n % 2 == 0 {
            high = !high;
        }
    }
    score
}

/// Manhattan distance of (row, col) from the grid centre, in cell units
///
/// Even grids have a centre between four cells; those four get distance 0.
pub fn center_distance(n: usize, row: usize, col: usize) -> i64 {
    let (n, row, col) = (n as i64, row as i64, col as i64);
    if n % 2 == 1 {
        let mid = (n - 1) / 2;
        (row - mid).abs() + (col - mid).abs()
    } else {
        ((2 * row - (n - 1)).abs() + (2 * col - (n - 1)).abs()) / 2 - 1
    }
}

fn distance_to_center(gene: &[Allele], n: usize) -> i64 {
    let size = n as i64;
    gene.iter()
        .enumerate()
        .map(|(cell, &value)| {
            let target = center_distance(n, cell / n, cell % n);
            size - (target - value as i64).abs()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Canonical valid sudoku of edge `n` (shifted-row pattern)
    fn solved_grid(n: usize) -> Vec<Allele> {
        let b = box_size(n).unwrap();
        (0..n * n)
            .map(|cell| {
                let (row, col) = (cell / n, cell % n);
                ((row * b + row / b + col) % n) as Allele
            })
            .collect()
    }

    #[test]
    fn test_registry_order_matches_index() {
        for (index, kind) in REGISTRY.iter().enumerate() {
            assert_eq!(kind.index(), index);
            assert_eq!(FitnessKind::from_index(index), *kind);
        }
    }

    #[test]
    fn test_box_size() {
        assert_eq!(box_size(1), Some(1));
        assert_eq!(box_size(9), Some(3));
        assert_eq!(box_size(36), Some(6));
        assert_eq!(box_size(8), None);
    }

    #[test]
    fn test_valid_sudoku_scores_optimum() {
        for n in [1, 4, 9, 16, 25, 36] {
            let gene = solved_grid(n);
            let kind = FitnessKind::GridConstraint;
            assert_eq!(kind.evaluate(&gene, n), kind.optimum(n), "n = {}", n);
        }
        assert_eq!(FitnessKind::GridConstraint.evaluate(&solved_grid(9), 9), 243);
    }

    #[test]
    fn test_uniform_grid_scores_zero_for_constraint() {
        // Every unit holds one symbol N times, so nothing occurs exactly once
        let gene = vec![0; 16];
        assert_eq!(FitnessKind::GridConstraint.evaluate(&gene, 4), 0);
    }

    #[test]
    fn test_constraint_heat_zero_on_solution() {
        let gene = solved_grid(9);
        assert!(FitnessKind::GridConstraint.heat(&gene, 9).iter().all(|&h| h == 0));
    }

    #[test]
    fn test_constraint_heat_marks_duplicates() {
        let mut gene = solved_grid(4);
        gene[1] = gene[0];
        let heat = FitnessKind::GridConstraint.heat(&gene, 4);
        assert!(heat[0] > 0);
        assert!(heat[1] > 0);
        assert_eq!(heat[15], 0);
    }

    #[test]
    fn test_alternating_checkerboard_is_optimal() {
        for n in [2, 3, 4, 5] {
            let top = (n - 1) as Allele;
            let gene: Vec<Allele> = (0..n * n)
                .map(|cell| if (cell / n + cell % n) % 2 == 0 { top } else { 0 })
                .collect();
            let kind = FitnessKind::Alternating;
            assert_eq!(kind.evaluate(&gene, n), kind.optimum(n), "n = {}", n);
        }
    }

    #[test]
    fn test_alternating_stripes_not_optimal_for_even_grid() {
        // Column stripes only line up with a checkerboard on odd grids
        let gene: Vec<Allele> = (0..16).map(|cell| if cell % 2 == 0 { 3 } else { 0 }).collect();
        assert!(FitnessKind::Alternating.evaluate(&gene, 4) < FitnessKind::Alternating.optimum(4));
    }

    #[test]
    fn test_maximize_and_minimize() {
        let gene = vec![0, 1, 2, 2, 2, 2, 1, 1, 0];
        assert_eq!(FitnessKind::Maximize.evaluate(&gene, 3), 11);
        assert_eq!(FitnessKind::Minimize.evaluate(&gene, 3), 18 - 11);
        assert_eq!(FitnessKind::Maximize.evaluate(&[2; 9], 3), FitnessKind::Maximize.optimum(3));
        assert_eq!(FitnessKind::Minimize.evaluate(&[0; 9], 3), FitnessKind::Minimize.optimum(3));
    }

    #[test]
    fn test_center_distance_odd_and_even() {
        assert_eq!(center_distance(3, 1, 1), 0);
        assert_eq!(center_distance(3, 0, 0), 2);
        assert_eq!(center_distance(4, 1, 2), 0);
        assert_eq!(center_distance(4, 0, 0), 2);
        assert_eq!(center_distance(4, 3, 3), 2);
    }

    #[test]
    fn test_distance_to_center_optimum() {
        for n in [2, 3, 4, 9] {
            let gene: Vec<Allele> = (0..n * n)
                .map(|cell| center_distance(n, cell / n, cell % n) as Allele)
                .collect();
            assert!(gene.iter().all(|&v| (v as usize) < n));
            let kind = FitnessKind::DistanceToCenter;
            assert_eq!(kind.evaluate(&gene, n), kind.optimum(n));
        }
    }

    #[test]
    fn test_default_heat_is_gene() {
        let gene = vec![1, 0, 2, 2, 1, 0, 0, 0, 1];
        let heat = FitnessKind::Maximize.heat(&gene, 3);
        assert_eq!(heat, vec![1, 0, 2, 2, 1, 0, 0, 0, 1]);
    }
}
