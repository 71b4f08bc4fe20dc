//! Node behavior snapshots and the graph provider interface
//!
//! The detection engine never owns the network. It reads topology and
//! traffic counters through [`GraphProvider`].

use serde::{Deserialize, Serialize};

/// Stable node identifier, dense in `[0, node_count)`
pub type NodeId = usize;

/// Read-only view of a node's traffic behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSnapshot {
    /// Fraction of sent packets that arrived (0.0 - 1.0)
    pub delivery_ratio: f64,
    /// Packets the node sent
    pub packets_sent: u32,
    /// Packets the node received
    pub packets_received: u32,
    /// Remaining energy, when the provider tracks it
    pub energy: Option<f64>,
}

impl BehaviorSnapshot {
    /// Build a snapshot from raw counters.
    ///
    /// The denominator is treated as at least 1, so an idle node reports
    /// a delivery ratio of 0 instead of dividing by zero.
    pub fn from_counters(packets_sent: u32, packets_received: u32, energy: Option<f64>) -> Self {
        let delivery_ratio = packets_received as f64 / packets_sent.max(1) as f64;
        Self {
            delivery_ratio,
            packets_sent,
            packets_received,
            energy,
        }
    }
}

/// Source of topology and behavior for the colony
pub trait GraphProvider {
    /// Number of nodes; ids are `0..node_count()`
    fn node_count(&self) -> usize;

    /// Neighbors of a node, in a stable order
    fn neighbors(&self, node: NodeId) -> &[NodeId];

    /// Current behavior snapshot of a node
    fn behavior(&self, node: NodeId) -> BehaviorSnapshot;

    /// Neighbor count, the topology fact the heuristic uses
    fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    /// Whether an id falls inside the node range
    fn contains(&self, node: NodeId) -> bool {
        node < self.node_count()
    }
}
