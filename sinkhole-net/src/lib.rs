//! Sinkhole-ACO Network Layer
//!
//! Simulates the wireless sensor network the colony searches:
//! - Random geometric topology with a fixed radio range
//! - Sinkhole injection with attacker traffic profiles
//! - Packet traffic simulation producing per-node counters

pub mod config;
pub mod network;
pub mod node;
pub mod traffic;

pub use config::*;
pub use network::*;
pub use node::*;
pub use traffic::*;
