//! Suspicion heuristic
//!
//! Maps a behavior snapshot and the node's neighbor count to an additive
//! suspicion score. Each rule contributes independently; the weights sum
//! to 1.0 so the score stays in `[0.0, 1.0]`.

use crate::{BehaviorSnapshot, GraphProvider, NodeId};

/// Delivery ratio below which a node looks like it drops traffic
pub const LOW_DELIVERY_RATIO: f64 = 0.38;
pub const LOW_DELIVERY_WEIGHT: f64 = 0.4;

/// Traffic volume and delivery cutoffs for the combined rule
pub const HIGH_TRAFFIC_PACKETS: u32 = 35;
pub const VERY_LOW_DELIVERY_RATIO: f64 = 0.28;
pub const HIGH_TRAFFIC_WEIGHT: f64 = 0.3;

/// Energy below which a busy node is anomalous
pub const LOW_ENERGY: f64 = 40.0;
pub const LOW_ENERGY_WEIGHT: f64 = 0.2;

/// Neighbor count above which a node advertises itself too well
pub const HIGH_DEGREE: usize = 6;
pub const HIGH_DEGREE_WEIGHT: f64 = 0.1;

/// A node is flagged when its score strictly exceeds this
pub const SUSPICION_THRESHOLD: f64 = 0.7;

/// Suspicion score in `[0.0, 1.0]`
pub fn suspicion_score(behavior: &BehaviorSnapshot, neighbor_count: usize) -> f64 {
    let mut score = 0.0;

    if behavior.delivery_ratio < LOW_DELIVERY_RATIO {
        score += LOW_DELIVERY_WEIGHT;
    }

    if behavior.packets_sent > HIGH_TRAFFIC_PACKETS
        && behavior.delivery_ratio < VERY_LOW_DELIVERY_RATIO
    {
        score += HIGH_TRAFFIC_WEIGHT;
    }

    // Providers without energy tracking only lose this term
    if let Some(energy) = behavior.energy {
        if energy < LOW_ENERGY {
            score += LOW_ENERGY_WEIGHT;
        }
    }

    if neighbor_count > HIGH_DEGREE {
        score += HIGH_DEGREE_WEIGHT;
    }

    score
}

/// Score a node straight from a graph provider
pub fn score_node<G: GraphProvider + ?Sized>(graph: &G, node: NodeId) -> f64 {
    suspicion_score(&graph.behavior(node), graph.degree(node))
}

/// Whether a score is high enough for an agent to flag the node
pub fn is_suspicious(score: f64) -> bool {
    score > SUSPICION_THRESHOLD
}
