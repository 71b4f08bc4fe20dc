//! Sinkhole-ACO Agents
//!
//! The stochastic walkers of the colony:
//! - **Ant**: evaluates the node it stands on, then picks its next hop
//! - **Selection**: candidate filtering, transition weights and the
//!   weighted draw that turns them into a move

pub mod ant;
pub mod selection;

pub use ant::*;
pub use selection::*;
