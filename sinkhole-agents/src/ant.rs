//! Ant agent
//!
//! Each iteration an ant runs two phases:
//! - **At node**: record the visit, score the node, flag it if suspicious
//! - **Selecting next**: draw a neighbor by pheromone and visibility, or
//!   stay put when no neighbor is eligible
//!
//! Ants only read the pheromone matrix. Deposits happen in the colony's
//! update phase once every ant has moved.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use sinkhole_core::{is_suspicious, score_node, GraphProvider, NodeId, PheromoneMatrix};

use crate::{candidates, sample_index, transition_weight, visibility, MovementPolicy};

/// What happened during one step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Node the ant evaluated
    pub evaluated: NodeId,
    /// Suspicion score it assigned
    pub score: f64,
    /// Whether the node was flagged on this visit
    pub flagged: bool,
    /// Next node, `None` when the ant stayed
    pub moved_to: Option<NodeId>,
}

/// A stochastic walker with its own trail and suspicion votes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ant {
    id: usize,
    current_node: NodeId,
    trail: Vec<NodeId>,
    suspicious: BTreeSet<NodeId>,
}

impl Ant {
    /// Create an ant at a starting node
    pub fn new(id: usize, start: NodeId) -> Self {
        Self {
            id,
            current_node: start,
            trail: Vec::new(),
            suspicious: BTreeSet::new(),
        }
    }

    /// Create an ant at a uniformly random node
    pub fn spawn<R: Rng + ?Sized>(id: usize, node_count: usize, rng: &mut R) -> Self {
        Self::new(id, rng.gen_range(0..node_count))
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn current_node(&self) -> NodeId {
        self.current_node
    }

    /// Every node visited, in order
    pub fn trail(&self) -> &[NodeId] {
        &self.trail
    }

    /// Nodes this ant flagged at least once
    pub fn suspicious(&self) -> &BTreeSet<NodeId> {
        &self.suspicious
    }

    pub fn has_flagged(&self, node: NodeId) -> bool {
        self.suspicious.contains(&node)
    }

    /// Run one iteration: evaluate the current node, then move or stay
    pub fn step<G, R>(
        &mut self,
        graph: &G,
        pheromones: &PheromoneMatrix,
        policy: &MovementPolicy,
        rng: &mut R,
    ) -> StepOutcome
    where
        G: GraphProvider + ?Sized,
        R: Rng + ?Sized,
    {
        let evaluated = self.current_node;
        let (score, flagged) = self.evaluate(graph);
        let moved_to = self.select_next(graph, pheromones, policy, rng);

        if let Some(next) = moved_to {
            self.current_node = next;
        }

        trace!(
            "Ant {} at {} scored {:.2} -> {:?}",
            self.id,
            evaluated,
            score,
            moved_to
        );

        StepOutcome {
            evaluated,
            score,
            flagged,
            moved_to,
        }
    }

    fn evaluate<G: GraphProvider + ?Sized>(&mut self, graph: &G) -> (f64, bool) {
        self.trail.push(self.current_node);

        let score = score_node(graph, self.current_node);
        let flagged = is_suspicious(score);
        if flagged {
            self.suspicious.insert(self.current_node);
        }

        (score, flagged)
    }

    fn select_next<G, R>(
        &self,
        graph: &G,
        pheromones: &PheromoneMatrix,
        policy: &MovementPolicy,
        rng: &mut R,
    ) -> Option<NodeId>
    where
        G: GraphProvider + ?Sized,
        R: Rng + ?Sized,
    {
        let options = candidates(
            graph.neighbors(self.current_node),
            &self.trail,
            policy.recent_window,
        );
        if options.is_empty() {
            return None;
        }

        let weights: Vec<f64> = options
            .iter()
            .map(|&next| {
                let pheromone = pheromones.get(self.current_node, next);
                transition_weight(pheromone, visibility(&graph.behavior(next)), policy)
            })
            .collect();

        sample_index(&weights, rng).map(|idx| options[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sinkhole_net::{Position, SensorNetwork, SensorNode};

    fn line(len: usize) -> SensorNetwork {
        let mut network = SensorNetwork::from_nodes(
            (0..len)
                .map(|id| SensorNode::new(id, Position::default()).with_counters(10, 9))
                .collect(),
        );
        for id in 1..len {
            network.connect(id - 1, id);
        }
        network
    }

    #[test]
    fn test_step_records_visit_and_moves() {
        let network = line(3);
        let pheromones = PheromoneMatrix::new(3, 0.5);
        let mut rng = StdRng::seed_from_u64(1);
        let mut ant = Ant::new(0, 0);

        let outcome = ant.step(&network, &pheromones, &MovementPolicy::default(), &mut rng);
        assert_eq!(outcome.evaluated, 0);
        assert_eq!(outcome.moved_to, Some(1));
        assert_eq!(ant.trail(), &[0]);
        assert_eq!(ant.current_node(), 1);
        assert!(!outcome.flagged);
    }

    #[test]
    fn test_isolated_node_stays_put() {
        let network = SensorNetwork::from_nodes(vec![SensorNode::new(0, Position::default())]);
        let pheromones = PheromoneMatrix::new(1, 0.5);
        let mut rng = StdRng::seed_from_u64(1);
        let mut ant = Ant::new(0, 0);

        for _ in 0..3 {
            let outcome = ant.step(&network, &pheromones, &MovementPolicy::default(), &mut rng);
            assert_eq!(outcome.moved_to, None);
        }
        assert_eq!(ant.trail(), &[0, 0, 0]);
    }

    #[test]
    fn test_dead_end_after_recent_window() {
        // 0 - 1 - 2: from 2 the only neighbor is in the recent window
        let network = line(3);
        let pheromones = PheromoneMatrix::new(3, 0.5);
        let mut rng = StdRng::seed_from_u64(4);
        let mut ant = Ant::new(0, 0);
        let policy = MovementPolicy::default();

        ant.step(&network, &pheromones, &policy, &mut rng);
        ant.step(&network, &pheromones, &policy, &mut rng);
        assert_eq!(ant.current_node(), 2);

        let outcome = ant.step(&network, &pheromones, &policy, &mut rng);
        assert_eq!(outcome.moved_to, None);
        assert_eq!(ant.current_node(), 2);
    }

    #[test]
    fn test_flags_sinkhole_once_per_set() {
        let mut network = SensorNetwork::fully_connected(10);
        if let Some(node) = network.node_mut(0) {
            node.packets_sent = 100;
            node.packets_received = 5;
            node.energy = 20.0;
        }
        let pheromones = PheromoneMatrix::new(10, 0.5);
        let mut rng = StdRng::seed_from_u64(8);
        let mut ant = Ant::new(0, 0);

        let outcome = ant.step(&network, &pheromones, &MovementPolicy::default(), &mut rng);
        assert!(outcome.flagged);
        assert!(outcome.score > 0.7);
        assert!(ant.has_flagged(0));
        assert_eq!(ant.suspicious().len(), 1);
    }

    #[test]
    fn test_clean_nodes_never_flagged() {
        let mut network = SensorNetwork::fully_connected(8);
        for id in 0..8 {
            if let Some(node) = network.node_mut(id) {
                node.packets_sent = 10;
                node.packets_received = 10;
            }
        }
        // One slightly lossy node
        if let Some(node) = network.node_mut(3) {
            node.packets_received = 9;
        }
        let pheromones = PheromoneMatrix::new(8, 0.5);
        let mut rng = StdRng::seed_from_u64(21);
        let mut ant = Ant::spawn(0, 8, &mut rng);

        for _ in 0..100 {
            ant.step(&network, &pheromones, &MovementPolicy::default(), &mut rng);
        }
        assert!(ant.suspicious().is_empty());
        assert_eq!(ant.trail().len(), 100);
    }

    #[test]
    fn test_pheromone_biases_selection() {
        let network = SensorNetwork::fully_connected(3);
        let mut pheromones = PheromoneMatrix::new(3, 0.5);
        pheromones.deposit(0, 2, 500.0);
        let mut rng = StdRng::seed_from_u64(13);

        let mut hits = 0;
        for _ in 0..200 {
            let mut ant = Ant::new(0, 0);
            let outcome = ant.step(&network, &pheromones, &MovementPolicy::default(), &mut rng);
            if outcome.moved_to == Some(2) {
                hits += 1;
            }
        }
        assert!(hits > 190);
    }
}
