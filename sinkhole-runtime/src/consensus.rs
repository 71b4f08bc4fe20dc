//! Consensus Detector
//!
//! A node is declared an attack only when three independent signals agree:
//! - enough distinct ants flagged it
//! - its strongest outgoing pheromone edge is above threshold
//! - its raw traffic counters look like a sinkhole
//!
//! The raw behavior cutoffs here deliberately differ from the suspicion
//! heuristic's so the two signals stay independent.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use sinkhole_agents::Ant;
use sinkhole_core::{BehaviorSnapshot, ColonyConfig, GraphProvider, NodeId, PheromoneMatrix};

/// Delivery ratio below which the behavior check counts a point
pub const BEHAVIOR_LOW_DELIVERY: f64 = 0.4;

/// Sent packets above which the behavior check counts a point
pub const BEHAVIOR_HIGH_TRAFFIC: u32 = 30;

/// Received below this fraction of sent counts a point
pub const BEHAVIOR_RECEIVE_FRACTION: f64 = 0.3;

/// Points required from the behavior check
pub const BEHAVIOR_SCORE_REQUIRED: u32 = 2;

/// Raw-counter behavior score in `0..=3`
pub fn behavior_score(behavior: &BehaviorSnapshot) -> u32 {
    let mut score = 0;
    if behavior.delivery_ratio < BEHAVIOR_LOW_DELIVERY {
        score += 1;
    }
    if behavior.packets_sent > BEHAVIOR_HIGH_TRAFFIC {
        score += 1;
    }
    if (behavior.packets_received as f64) < behavior.packets_sent as f64 * BEHAVIOR_RECEIVE_FRACTION {
        score += 1;
    }
    score
}

/// Distinct-agent votes per node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    votes: BTreeMap<NodeId, usize>,
}

impl VoteTally {
    /// Count, per node, how many ants flagged it at least once
    pub fn from_agents(agents: &[Ant]) -> Self {
        let mut votes = BTreeMap::new();
        for ant in agents {
            for &node in ant.suspicious() {
                *votes.entry(node).or_insert(0) += 1;
            }
        }
        Self { votes }
    }

    pub fn votes(&self, node: NodeId) -> usize {
        self.votes.get(&node).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, usize)> + '_ {
        self.votes.iter().map(|(&node, &votes)| (node, votes))
    }

    /// Number of nodes with at least one vote
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}

/// The detected-attack set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectedAttacks(BTreeSet<NodeId>);

impl DetectedAttacks {
    pub fn contains(&self, node: NodeId) -> bool {
        self.0.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Node ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().copied()
    }

    pub fn into_inner(self) -> BTreeSet<NodeId> {
        self.0
    }
}

impl FromIterator<NodeId> for DetectedAttacks {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Evidence gathered for one voted node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsensusVerdict {
    pub node: NodeId,
    pub votes: usize,
    pub max_pheromone: f64,
    pub behavior_score: u32,
    pub detected: bool,
}

/// Combines votes, pheromone and raw behavior into detections
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusDetector {
    config: ColonyConfig,
}

impl ConsensusDetector {
    pub fn new(config: &ColonyConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Votes a node needs when `agents` ants took part
    pub fn vote_threshold(&self, agents: usize) -> usize {
        self.config.vote_threshold(agents)
    }

    pub fn pheromone_threshold(&self) -> f64 {
        self.config.pheromone_threshold
    }

    /// Verdict for every node that received at least one vote, ascending by id
    pub fn evaluate<G: GraphProvider + ?Sized>(
        &self,
        graph: &G,
        agents: &[Ant],
        pheromones: &PheromoneMatrix,
    ) -> Vec<ConsensusVerdict> {
        let vote_threshold = self.vote_threshold(agents.len());
        VoteTally::from_agents(agents)
            .iter()
            .filter(|&(node, _)| graph.contains(node) && node < pheromones.size())
            .map(|(node, votes)| {
                let max_pheromone = pheromones.row_max(node);
                let behavior_score = behavior_score(&graph.behavior(node));
                let detected = votes >= vote_threshold
                    && max_pheromone >= self.config.pheromone_threshold
                    && behavior_score >= BEHAVIOR_SCORE_REQUIRED;

                ConsensusVerdict {
                    node,
                    votes,
                    max_pheromone,
                    behavior_score,
                    detected,
                }
            })
            .collect()
    }

    /// Nodes satisfying all three conditions
    pub fn detect<G: GraphProvider + ?Sized>(
        &self,
        graph: &G,
        agents: &[Ant],
        pheromones: &PheromoneMatrix,
    ) -> DetectedAttacks {
        self.evaluate(graph, agents, pheromones)
            .into_iter()
            .filter(|v| v.detected)
            .map(|v| v.node)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sinkhole_agents::MovementPolicy;
    use sinkhole_net::SensorNetwork;

    fn sinkhole_network() -> SensorNetwork {
        let mut network = SensorNetwork::fully_connected(10);
        for id in 0..10 {
            if let Some(node) = network.node_mut(id) {
                node.packets_sent = 20;
                node.packets_received = 18;
            }
        }
        if let Some(node) = network.node_mut(4) {
            node.packets_sent = 100;
            node.packets_received = 5;
            node.energy = 20.0;
        }
        network
    }

    /// Ants that each stood on node 4 once
    fn voters(count: usize, network: &SensorNetwork) -> Vec<Ant> {
        let pheromones = PheromoneMatrix::new(10, 0.5);
        let mut rng = StdRng::seed_from_u64(0);
        (0..count)
            .map(|id| {
                let mut ant = Ant::new(id, 4);
                ant.step(network, &pheromones, &MovementPolicy::default(), &mut rng);
                ant
            })
            .collect()
    }

    #[test]
    fn test_behavior_score() {
        assert_eq!(behavior_score(&BehaviorSnapshot::from_counters(100, 5, None)), 3);
        assert_eq!(behavior_score(&BehaviorSnapshot::from_counters(31, 30, None)), 1);
        assert_eq!(behavior_score(&BehaviorSnapshot::from_counters(10, 10, None)), 0);
        // Idle node: ratio 0 but nothing sent
        assert_eq!(behavior_score(&BehaviorSnapshot::from_counters(0, 0, None)), 1);
    }

    #[test]
    fn test_vote_tally_counts_distinct_agents() {
        let network = sinkhole_network();
        let agents = voters(3, &network);
        let tally = VoteTally::from_agents(&agents);
        assert_eq!(tally.votes(4), 3);
        assert_eq!(tally.votes(0), 0);
        assert_eq!(tally.len(), 1);
    }

    #[test]
    fn test_all_three_signals_required() {
        let network = sinkhole_network();
        let agents = voters(3, &network);
        let detector = ConsensusDetector::new(&ColonyConfig::new(3));

        // Weak pheromone: no detection
        let weak = PheromoneMatrix::new(10, 0.5);
        assert!(detector.detect(&network, &agents, &weak).is_empty());

        let mut strong = PheromoneMatrix::new(10, 0.5);
        strong.deposit(4, 1, 10.0);
        let detected = detector.detect(&network, &agents, &strong);
        assert!(detected.contains(4));
        assert_eq!(detected.len(), 1);

        // Too few votes
        let lone = voters(1, &network);
        assert!(detector.detect(&network, &lone, &strong).is_empty());
    }

    #[test]
    fn test_behavior_check_blocks_clean_counters() {
        let mut network = sinkhole_network();
        let agents = voters(3, &network);
        // Counters recovered after the ants voted
        if let Some(node) = network.node_mut(4) {
            node.packets_sent = 20;
            node.packets_received = 19;
        }
        let mut strong = PheromoneMatrix::new(10, 0.5);
        strong.deposit(4, 1, 10.0);

        let detector = ConsensusDetector::new(&ColonyConfig::new(3));
        let verdicts = detector.evaluate(&network, &agents, &strong);
        assert_eq!(verdicts.len(), 1);
        assert!(!verdicts[0].detected);
        assert_eq!(verdicts[0].votes, 3);
    }

    #[test]
    fn test_single_agent_never_reaches_consensus() {
        let network = sinkhole_network();
        let agents = voters(1, &network);
        let detector = ConsensusDetector::new(&ColonyConfig::new(1));
        assert_eq!(detector.vote_threshold(agents.len()), 2);

        let mut strong = PheromoneMatrix::new(10, 0.5);
        strong.deposit(4, 1, 1_000.0);
        assert!(detector.detect(&network, &agents, &strong).is_empty());
    }

    #[test]
    fn test_threshold_counts_participating_agents() {
        let network = sinkhole_network();
        let mut strong = PheromoneMatrix::new(10, 0.5);
        strong.deposit(4, 1, 10.0);

        // Sized for one ant, but twenty take part: three votes fall short of four
        let detector = ConsensusDetector::new(&ColonyConfig::new(1));
        let mut agents = voters(3, &network);
        agents.extend((3..20).map(|id| Ant::new(id, 0)));

        let verdicts = detector.evaluate(&network, &agents, &strong);
        assert_eq!(detector.vote_threshold(agents.len()), 4);
        assert_eq!(verdicts[0].votes, 3);
        assert!(!verdicts[0].detected);

        agents.truncate(3);
        assert!(detector.detect(&network, &agents, &strong).contains(4));
    }

    #[test]
    fn test_detection_is_idempotent() {
        let network = sinkhole_network();
        let agents = voters(4, &network);
        let mut pheromones = PheromoneMatrix::new(10, 0.5);
        pheromones.deposit(4, 2, 8.0);
        let detector = ConsensusDetector::new(&ColonyConfig::new(4));

        let first = detector.detect(&network, &agents, &pheromones);
        let second = detector.detect(&network, &agents, &pheromones);
        assert_eq!(first, second);
    }
}
