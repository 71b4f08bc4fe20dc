//! Pheromone Matrix - shared evidence between ordered node pairs
//!
//! The matrix is the colony's memory:
//! - Every entry starts at the same positive weight
//! - Evaporation scales all entries down once per iteration
//! - Reinforcement only ever adds, so entries never go negative

use serde::{Deserialize, Serialize};

use crate::NodeId;

/// Dense `n × n` non-negative weight matrix, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PheromoneMatrix {
    size: usize,
    weights: Vec<f64>,
}

impl PheromoneMatrix {
    /// Create a matrix with every entry set to `initial`
    pub fn new(size: usize, initial: f64) -> Self {
        Self {
            size,
            weights: vec![initial.max(0.0); size * size],
        }
    }

    /// Number of nodes along each side
    pub fn size(&self) -> usize {
        self.size
    }

    /// Weight of the edge `from -> to`
    pub fn get(&self, from: NodeId, to: NodeId) -> f64 {
        self.weights[self.index(from, to)]
    }

    /// One node's outgoing weights
    pub fn row(&self, node: NodeId) -> &[f64] {
        let start = node * self.size;
        &self.weights[start..start + self.size]
    }

    /// Largest outgoing weight of a node (0.0 for an empty matrix)
    pub fn row_max(&self, node: NodeId) -> f64 {
        self.row(node).iter().copied().fold(0.0, f64::max)
    }

    /// Multiply every entry by `1 - rho`
    pub fn evaporate(&mut self, rho: f64) {
        let retain = (1.0 - rho).clamp(0.0, 1.0);
        for weight in &mut self.weights {
            *weight *= retain;
        }
    }

    /// Add `amount` to the edge `from -> to`. Negative amounts are ignored.
    pub fn deposit(&mut self, from: NodeId, to: NodeId, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        let idx = self.index(from, to);
        self.weights[idx] += amount;
    }

    /// Get matrix statistics
    pub fn stats(&self) -> PheromoneStats {
        let total: f64 = self.weights.iter().sum();
        let mean = if self.weights.is_empty() {
            0.0
        } else {
            total / self.weights.len() as f64
        };
        let max = self.weights.iter().copied().fold(0.0, f64::max);
        let min = self
            .weights
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);

        PheromoneStats {
            total,
            mean,
            max,
            min: if min.is_finite() { min } else { 0.0 },
        }
    }

    fn index(&self, from: NodeId, to: NodeId) -> usize {
        debug_assert!(from < self.size && to < self.size);
        from * self.size + to
    }
}

/// Pheromone matrix statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PheromoneStats {
    pub total: f64,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_initialization() {
        let matrix = PheromoneMatrix::new(4, 0.5);
        assert_eq!(matrix.size(), 4);
        assert!(matrix.row(2).iter().all(|&w| w == 0.5));
        assert_eq!(matrix.row_max(3), 0.5);
    }

    #[test]
    fn test_evaporation_is_monotone_and_non_negative() {
        for rho in [0.01, 0.1, 0.5, 0.99] {
            let mut matrix = PheromoneMatrix::new(3, 0.5);
            matrix.deposit(0, 1, 10.0);
            let mut previous = matrix.clone();

            for _ in 0..200 {
                matrix.evaporate(rho);
                for from in 0..3 {
                    for to in 0..3 {
                        let now = matrix.get(from, to);
                        assert!(now >= 0.0);
                        assert!(now <= previous.get(from, to));
                    }
                }
                previous = matrix.clone();
            }

            assert!(matrix.stats().max < 1e-3 || rho < 0.05);
        }
    }

    #[test]
    fn test_deposit_only_adds() {
        let mut matrix = PheromoneMatrix::new(2, 0.5);
        matrix.deposit(0, 1, 3.0);
        matrix.deposit(0, 1, -100.0);
        assert_eq!(matrix.get(0, 1), 3.5);
        assert_eq!(matrix.get(1, 0), 0.5);
        assert_eq!(matrix.row_max(0), 3.5);
    }

    #[test]
    fn test_stats() {
        let mut matrix = PheromoneMatrix::new(2, 1.0);
        matrix.deposit(1, 1, 4.0);
        let stats = matrix.stats();
        assert_eq!(stats.total, 8.0);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.min, 1.0);

        let empty = PheromoneMatrix::new(0, 0.5).stats();
        assert_eq!(empty, PheromoneStats::default());
    }
}
