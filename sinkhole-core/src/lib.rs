//! Sinkhole-ACO Core - Behavior model and shared state for colony detection
//!
//! This crate provides the foundational primitives:
//! - Node behavior snapshots and the graph provider interface
//! - The suspicion heuristic agents use to judge a node
//! - The pheromone matrix with evaporation and reinforcement
//! - Colony configuration

pub mod behavior;
pub mod config;
pub mod error;
pub mod heuristic;
pub mod pheromone;

pub use behavior::*;
pub use config::*;
pub use error::*;
pub use heuristic::*;
pub use pheromone::*;

/// Initial weight of every pheromone entry
pub const DEFAULT_INITIAL_PHEROMONE: f64 = 0.5;

/// Pheromone importance exponent
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Heuristic importance exponent
pub const DEFAULT_BETA: f64 = 2.0;

/// Evaporation rate applied once per iteration
pub const DEFAULT_RHO: f64 = 0.1;

/// Pheromone deposit constant (Q)
pub const DEFAULT_DEPOSIT_CONSTANT: f64 = 100.0;

/// How many of the most recent trail entries are excluded from selection
pub const DEFAULT_RECENT_WINDOW: usize = 3;
