//! Next-hop selection
//!
//! Candidates are the current node's neighbors minus the most recent
//! trail entries. Each candidate is weighted by
//! `pheromone^alpha * heuristic^beta` and one is drawn from the
//! normalized distribution.

use rand::Rng;
use serde::{Deserialize, Serialize};

use sinkhole_core::{BehaviorSnapshot, ColonyConfig, NodeId};

/// Hop distance used by the visibility heuristic (all links cost the same)
pub const HOP_DISTANCE: f64 = 1.0;

/// Offset keeping the visibility finite
pub const DISTANCE_OFFSET: f64 = 0.1;

/// Neighbors delivering less than this look suspect
pub const SUSPECT_NEIGHBOR_RATIO: f64 = 0.4;

/// Visibility multiplier for suspect neighbors
pub const SUSPECT_NEIGHBOR_BOOST: f64 = 2.0;

/// The parameters an ant needs to move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementPolicy {
    pub alpha: f64,
    pub beta: f64,
    pub recent_window: usize,
}

impl Default for MovementPolicy {
    fn default() -> Self {
        Self::from(&ColonyConfig::default())
    }
}

impl From<&ColonyConfig> for MovementPolicy {
    fn from(config: &ColonyConfig) -> Self {
        Self {
            alpha: config.alpha,
            beta: config.beta,
            recent_window: config.recent_window,
        }
    }
}

/// Neighbors not among the last `window` trail entries, in neighbor order
pub fn candidates(neighbors: &[NodeId], trail: &[NodeId], window: usize) -> Vec<NodeId> {
    let recent = &trail[trail.len().saturating_sub(window)..];
    neighbors
        .iter()
        .copied()
        .filter(|n| !recent.contains(n))
        .collect()
}

/// Visibility of a candidate, doubled when it already looks suspect
pub fn visibility(behavior: &BehaviorSnapshot) -> f64 {
    let base = 1.0 / (HOP_DISTANCE + DISTANCE_OFFSET);
    if behavior.delivery_ratio < SUSPECT_NEIGHBOR_RATIO {
        base * SUSPECT_NEIGHBOR_BOOST
    } else {
        base
    }
}

/// Unnormalized transition weight
pub fn transition_weight(pheromone: f64, visibility: f64, policy: &MovementPolicy) -> f64 {
    pheromone.powf(policy.alpha) * visibility.powf(policy.beta)
}

/// Draw an index with probability proportional to its weight.
///
/// Walks the cumulative distribution. Returns `None` when the weights do
/// not sum to a positive finite total.
pub fn sample_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if !(total > 0.0 && total.is_finite()) {
        return None;
    }

    let target = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;

    for (idx, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last_positive = Some(idx);
        if target < cumulative {
            return Some(idx);
        }
    }

    // Rounding can leave target a hair above the final cumulative sum
    last_positive
}
