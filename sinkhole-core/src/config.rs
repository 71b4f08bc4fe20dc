//! Colony configuration

use serde::{Deserialize, Serialize};

use crate::{
    CoreError, Result, DEFAULT_ALPHA, DEFAULT_BETA, DEFAULT_DEPOSIT_CONSTANT,
    DEFAULT_INITIAL_PHEROMONE, DEFAULT_RECENT_WINDOW, DEFAULT_RHO,
};

/// Parameters for one colony run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    /// Number of ants (default: 20)
    pub num_agents: usize,

    /// Iterations per run (default: 50)
    pub iterations: usize,

    /// Pheromone exponent (default: 1.0)
    pub alpha: f64,

    /// Heuristic exponent (default: 2.0)
    pub beta: f64,

    /// Evaporation rate, must lie in (0, 1) (default: 0.1)
    pub rho: f64,

    /// Deposit constant Q (default: 100.0)
    pub deposit_constant: f64,

    /// Starting weight for every matrix entry (default: 0.5)
    pub initial_pheromone: f64,

    /// Trail entries excluded from next-hop selection (default: 3)
    pub recent_window: usize,

    /// Share of the deposit spread to a suspicious node's neighbors (default: 0.5)
    pub neighbor_spread: f64,

    /// Minimum row maximum required to confirm a detection (default: 7.0)
    pub pheromone_threshold: f64,

    /// Absolute vote floor (default: 2)
    pub min_votes: usize,

    /// The colony fraction that must vote is `1 / vote_fraction_divisor` (default: 5)
    pub vote_fraction_divisor: usize,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            num_agents: 20,
            iterations: 50,
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            rho: DEFAULT_RHO,
            deposit_constant: DEFAULT_DEPOSIT_CONSTANT,
            initial_pheromone: DEFAULT_INITIAL_PHEROMONE,
            recent_window: DEFAULT_RECENT_WINDOW,
            neighbor_spread: 0.5,
            pheromone_threshold: 7.0,
            min_votes: 2,
            vote_fraction_divisor: 5,
        }
    }
}

impl ColonyConfig {
    /// Create a config with a given colony size
    pub fn new(num_agents: usize) -> Self {
        Self {
            num_agents,
            ..Default::default()
        }
    }

    pub fn with_agents(mut self, num_agents: usize) -> Self {
        self.num_agents = num_agents;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the evaporation rate
    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    /// Set the pheromone and heuristic exponents
    pub fn with_exponents(mut self, alpha: f64, beta: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    pub fn with_recent_window(mut self, window: usize) -> Self {
        self.recent_window = window;
        self
    }

    /// Votes needed before a node is considered: `max(min_votes, agents / divisor)`
    pub fn vote_threshold(&self, agents: usize) -> usize {
        let fraction = agents.checked_div(self.vote_fraction_divisor).unwrap_or(0);
        self.min_votes.max(fraction)
    }

    /// Check every parameter is in range
    pub fn validate(&self) -> Result<()> {
        if self.num_agents == 0 {
            return Err(CoreError::InvalidConfig("num_agents must be at least 1".into()));
        }
        if !(self.rho > 0.0 && self.rho < 1.0) {
            return Err(CoreError::InvalidConfig(format!(
                "rho must be in (0, 1), got {}",
                self.rho
            )));
        }
        if self.initial_pheromone <= 0.0 || !self.initial_pheromone.is_finite() {
            return Err(CoreError::InvalidConfig(format!(
                "initial_pheromone must be positive, got {}",
                self.initial_pheromone
            )));
        }
        for (name, value) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("deposit_constant", self.deposit_constant),
            ("neighbor_spread", self.neighbor_spread),
            ("pheromone_threshold", self.pheromone_threshold),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.recent_window == 0 {
            return Err(CoreError::InvalidConfig("recent_window must be at least 1".into()));
        }
        if self.min_votes < 2 {
            return Err(CoreError::InvalidConfig(format!(
                "min_votes must be at least 2, got {}",
                self.min_votes
            )));
        }
        if self.vote_fraction_divisor == 0 {
            return Err(CoreError::InvalidConfig(
                "vote_fraction_divisor must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
