//! Sensor network topology and sinkhole injection
//!
//! The network is the colony's graph provider. Topology is a random
//! geometric graph: nodes within radio range of each other are neighbors.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sinkhole_core::{BehaviorSnapshot, GraphProvider, NodeId};

use crate::{NetworkConfig, NetworkError, Position, SensorNode};

/// A simulated wireless sensor network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorNetwork {
    config: NetworkConfig,
    pub(crate) nodes: Vec<SensorNode>,
    pub(crate) sinkhole_nodes: Vec<NodeId>,
    pub(crate) total_packets_sent: u64,
    pub(crate) total_packets_received: u64,
}

impl SensorNetwork {
    /// Deploy a random network and inject sinkholes
    pub fn generate<R: Rng + ?Sized>(
        config: NetworkConfig,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        config.validate()?;

        let nodes = (0..config.num_nodes)
            .map(|id| {
                let position = Position::new(
                    rng.gen_range(0.0..=config.width),
                    rng.gen_range(0.0..=config.height),
                );
                SensorNode::new(id, position).with_energy(config.honest_energy.sample(rng))
            })
            .collect();

        let mut network = Self {
            config,
            nodes,
            sinkhole_nodes: Vec::new(),
            total_packets_sent: 0,
            total_packets_received: 0,
        };

        network.connect_within_range();
        info!(
            "Network created with {} nodes, average {:.1} neighbors per node",
            network.nodes.len(),
            network.average_degree()
        );

        network.inject_sinkholes(rng);
        info!(
            "Injected {} sinkhole attacks: {:?}",
            network.sinkhole_nodes.len(),
            network.sinkhole_nodes
        );

        Ok(network)
    }

    /// Every node linked to every other node, no traffic yet
    pub fn fully_connected(num_nodes: usize) -> Self {
        let mut network = Self::from_nodes(
            (0..num_nodes)
                .map(|id| SensorNode::new(id, Position::default()))
                .collect(),
        );
        for a in 0..num_nodes {
            for b in (a + 1)..num_nodes {
                network.connect(a, b);
            }
        }
        network
    }

    /// Wrap prepared nodes. Node `i` must carry id `i`.
    pub fn from_nodes(nodes: Vec<SensorNode>) -> Self {
        debug_assert!(nodes.iter().enumerate().all(|(i, n)| n.id == i));

        let sinkhole_nodes = nodes
            .iter()
            .filter(|n| n.is_malicious)
            .map(|n| n.id)
            .collect();
        let total_packets_sent = nodes.iter().map(|n| n.packets_sent as u64).sum();
        let total_packets_received = nodes.iter().map(|n| n.packets_received as u64).sum();

        Self {
            config: NetworkConfig::new(nodes.len().max(1)),
            nodes,
            sinkhole_nodes,
            total_packets_sent,
            total_packets_received,
        }
    }

    /// Link two nodes in both directions
    pub fn connect(&mut self, a: NodeId, b: NodeId) {
        if a == b || a >= self.nodes.len() || b >= self.nodes.len() {
            return;
        }
        self.nodes[a].add_neighbor(b);
        self.nodes[b].add_neighbor(a);
    }

    fn connect_within_range(&mut self) {
        let range = self.config.communication_range;
        let n = self.nodes.len();

        for a in 0..n {
            for b in (a + 1)..n {
                if self.nodes[a].position.distance(&self.nodes[b].position) <= range {
                    self.connect(a, b);
                }
            }
        }
    }

    fn inject_sinkholes<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let count = self.config.sinkholes.sample(rng).min(self.nodes.len());
        let chosen = rand::seq::index::sample(rng, self.nodes.len(), count).into_vec();

        for &id in &chosen {
            let node = &mut self.nodes[id];
            node.is_malicious = true;
            node.packets_sent = self.config.sinkhole_sent.sample(rng);
            node.packets_received = self.config.sinkhole_received.sample(rng);
            node.energy = self.config.sinkhole_energy.sample(rng);
            debug!("Node {} compromised", id);
        }

        self.sinkhole_nodes = chosen;
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn nodes(&self) -> &[SensorNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&SensorNode> {
        self.nodes.get(id)
    }

    /// Mutable node access; ground truth stays in sync via [`Self::mark_sinkhole`]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SensorNode> {
        self.nodes.get_mut(id)
    }

    /// Flag a node as a sinkhole in the ground truth
    pub fn mark_sinkhole(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.is_malicious = true;
            if !self.sinkhole_nodes.contains(&id) {
                self.sinkhole_nodes.push(id);
            }
        }
    }

    /// Ground-truth malicious nodes
    pub fn sinkhole_nodes(&self) -> &[NodeId] {
        &self.sinkhole_nodes
    }

    pub fn is_sinkhole(&self, id: NodeId) -> bool {
        self.sinkhole_nodes.contains(&id)
    }

    pub fn total_packets_sent(&self) -> u64 {
        self.total_packets_sent
    }

    pub fn total_packets_received(&self) -> u64 {
        self.total_packets_received
    }

    /// Mean neighbor count
    pub fn average_degree(&self) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        let total: usize = self.nodes.iter().map(|n| n.neighbors.len()).sum();
        total as f64 / self.nodes.len() as f64
    }
}

impl GraphProvider for SensorNetwork {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|n| n.neighbors.as_slice())
            .unwrap_or(&[])
    }

    fn behavior(&self, node: NodeId) -> BehaviorSnapshot {
        self.nodes
            .get(node)
            .map(SensorNode::behavior)
            .unwrap_or_else(|| BehaviorSnapshot::from_counters(0, 0, None))
    }
}
