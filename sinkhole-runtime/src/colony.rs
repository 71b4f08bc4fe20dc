//! Colony Controller
//!
//! Owns the pheromone matrix and the ant population and drives the loop:
//! - Every ant moves once, reading the matrix left by the previous iteration
//! - The matrix evaporates, then ants with votes reinforce it
//! - After the configured iterations, consensus runs exactly once
//!
//! Movement never interleaves with writes: ants get `&PheromoneMatrix`,
//! and only the update phase takes it mutably.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use sinkhole_agents::{Ant, MovementPolicy};
use sinkhole_core::{ColonyConfig, CoreError, GraphProvider, NodeId, PheromoneMatrix, PheromoneStats};

use crate::{ConsensusDetector, ConsensusVerdict, DetectedAttacks};

/// Iterations between progress log lines
const PROGRESS_INTERVAL: usize = 20;

/// The ant colony bound to one graph
pub struct Colony<'g, G: GraphProvider + ?Sized> {
    graph: &'g G,
    config: ColonyConfig,
    policy: MovementPolicy,
    detector: ConsensusDetector,
    pheromones: PheromoneMatrix,
    agents: Vec<Ant>,
    iterations_run: usize,
}

impl<'g, G: GraphProvider + ?Sized> Colony<'g, G> {
    /// Create a colony over a graph, rejecting out-of-range parameters
    pub fn new(graph: &'g G, config: ColonyConfig) -> Result<Self, CoreError> {
        config.validate()?;

        let pheromones = PheromoneMatrix::new(graph.node_count(), config.initial_pheromone);
        Ok(Self {
            graph,
            policy: MovementPolicy::from(&config),
            detector: ConsensusDetector::new(&config),
            config,
            pheromones,
            agents: Vec::new(),
            iterations_run: 0,
        })
    }

    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    pub fn agents(&self) -> &[Ant] {
        &self.agents
    }

    pub fn pheromones(&self) -> &PheromoneMatrix {
        &self.pheromones
    }

    /// Run with the configured iteration count
    pub fn run_default<R: Rng + ?Sized>(&mut self, rng: &mut R) -> DetectedAttacks {
        self.run(self.config.iterations, rng)
    }

    /// Fresh run: new matrix, new ants at random nodes, full loop, consensus
    pub fn run<R: Rng + ?Sized>(&mut self, iterations: usize, rng: &mut R) -> DetectedAttacks {
        let node_count = self.graph.node_count();
        if node_count == 0 {
            warn!("Graph has no nodes; nothing to search");
            self.reset();
            return DetectedAttacks::default();
        }

        self.reset();
        self.agents = (0..self.config.num_agents)
            .map(|id| Ant::spawn(id, node_count, rng))
            .collect();

        self.advance(iterations, rng)
    }

    /// Fresh run with ants placed on given nodes, one ant per entry
    pub fn run_from<R: Rng + ?Sized>(
        &mut self,
        starts: &[NodeId],
        iterations: usize,
        rng: &mut R,
    ) -> Result<DetectedAttacks, CoreError> {
        let node_count = self.graph.node_count();
        if let Some(&node) = starts.iter().find(|&&n| n >= node_count) {
            return Err(CoreError::NodeOutOfRange { node, node_count });
        }

        self.reset();
        self.agents = starts
            .iter()
            .enumerate()
            .map(|(id, &start)| Ant::new(id, start))
            .collect();

        Ok(self.advance(iterations, rng))
    }

    fn reset(&mut self) {
        self.pheromones =
            PheromoneMatrix::new(self.graph.node_count(), self.config.initial_pheromone);
        self.agents.clear();
        self.iterations_run = 0;
    }

    fn advance<R: Rng + ?Sized>(&mut self, iterations: usize, rng: &mut R) -> DetectedAttacks {
        info!(
            "Running ACO with {} ants, {} iterations (alpha={}, beta={}, rho={})",
            self.agents.len(),
            iterations,
            self.config.alpha,
            self.config.beta,
            self.config.rho
        );

        for iteration in 0..iterations {
            self.iterate(rng);

            if iteration % PROGRESS_INTERVAL == 0 {
                info!(
                    "Iteration {}: {} suspicious nodes found",
                    iteration,
                    self.distinct_suspicious()
                );
            }
        }

        let detected = self.detect();
        info!("ACO completed: {} attacks detected", detected.len());
        detected
    }

    /// One iteration: every ant moves, then the matrix is updated
    pub fn iterate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.move_agents(rng);
        self.update_pheromones();
        self.iterations_run += 1;

        let stats = self.pheromones.stats();
        debug!(
            "Iteration {} pheromone: total {:.2}, max {:.2}",
            self.iterations_run, stats.total, stats.max
        );
    }

    fn move_agents<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let pheromones = &self.pheromones;
        for ant in &mut self.agents {
            ant.step(self.graph, pheromones, &self.policy, rng);
        }
    }

    fn update_pheromones(&mut self) {
        self.pheromones.evaporate(self.config.rho);

        for ant in &self.agents {
            let suspicious = ant.suspicious();
            if suspicious.is_empty() {
                continue;
            }

            let deposit = self.config.deposit_constant * suspicious.len() as f64;

            // Reinforce the hops that led into a suspicious node
            for hop in ant.trail().windows(2) {
                if suspicious.contains(&hop[1]) {
                    self.pheromones.deposit(hop[0], hop[1], deposit);
                }
            }

            // Spread outward so neighbors of a suspect attract ants too
            let spread = deposit * self.config.neighbor_spread;
            for &node in suspicious {
                for &neighbor in self.graph.neighbors(node) {
                    self.pheromones.deposit(node, neighbor, spread);
                }
            }
        }
    }

    /// Run consensus on the current state
    pub fn detect(&self) -> DetectedAttacks {
        self.detector
            .detect(self.graph, &self.agents, &self.pheromones)
    }

    /// Per-node consensus evidence on the current state
    pub fn verdicts(&self) -> Vec<ConsensusVerdict> {
        self.detector
            .evaluate(self.graph, &self.agents, &self.pheromones)
    }

    fn distinct_suspicious(&self) -> usize {
        self.agents
            .iter()
            .flat_map(|ant| ant.suspicious().iter().copied())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Get colony statistics
    pub fn stats(&self) -> ColonyStats {
        ColonyStats {
            iterations: self.iterations_run,
            agents: self.agents.len(),
            distinct_suspicious: self.distinct_suspicious(),
            vote_threshold: self.detector.vote_threshold(self.agents.len()),
            pheromone_threshold: self.detector.pheromone_threshold(),
            pheromone: self.pheromones.stats(),
        }
    }
}

/// Colony statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColonyStats {
    pub iterations: usize,
    pub agents: usize,
    pub distinct_suspicious: usize,
    /// Votes needed given the ants in the last run
    pub vote_threshold: usize,
    pub pheromone_threshold: f64,
    pub pheromone: PheromoneStats,
}
