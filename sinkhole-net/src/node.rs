//! Sensor nodes

use serde::{Deserialize, Serialize};
use sinkhole_core::{BehaviorSnapshot, NodeId};

/// Default energy for nodes built without a deployment
pub const DEFAULT_ENERGY: f64 = 100.0;

/// Node position in the deployment area
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position
    pub fn distance(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A wireless sensor node and its traffic counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorNode {
    pub id: NodeId,
    pub position: Position,
    /// Ground truth; only the evaluator reads this
    pub is_malicious: bool,
    pub energy: f64,
    pub packets_sent: u32,
    pub packets_received: u32,
    pub neighbors: Vec<NodeId>,
}

impl SensorNode {
    pub fn new(id: NodeId, position: Position) -> Self {
        Self {
            id,
            position,
            is_malicious: false,
            energy: DEFAULT_ENERGY,
            packets_sent: 0,
            packets_received: 0,
            neighbors: Vec::new(),
        }
    }

    pub fn with_energy(mut self, energy: f64) -> Self {
        self.energy = energy;
        self
    }

    pub fn with_counters(mut self, sent: u32, received: u32) -> Self {
        self.packets_sent = sent;
        self.packets_received = received;
        self
    }

    pub fn malicious(mut self) -> Self {
        self.is_malicious = true;
        self
    }

    /// Behavior snapshot derived from the counters
    pub fn behavior(&self) -> BehaviorSnapshot {
        BehaviorSnapshot::from_counters(self.packets_sent, self.packets_received, Some(self.energy))
    }

    /// Link to another node, ignoring self-links and duplicates
    pub fn add_neighbor(&mut self, neighbor: NodeId) {
        if neighbor != self.id && !self.neighbors.contains(&neighbor) {
            self.neighbors.push(neighbor);
        }
    }
}
