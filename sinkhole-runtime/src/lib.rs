//! Sinkhole-ACO Runtime
//!
//! Drives detection end to end:
//! - **Colony**: the iterate-move-reinforce loop over a shared pheromone matrix
//! - **Consensus**: votes, pheromone and raw behavior combined into detections
//! - **Evaluation**: detection and false alarm rates against ground truth
//! - **Trials**: repeated seeded runs executed concurrently
//! - **Report**: a JSON record of one run

pub mod colony;
pub mod consensus;
pub mod error;
pub mod evaluation;
pub mod report;
pub mod settings;
pub mod simulation;
pub mod trials;

pub use colony::*;
pub use consensus::*;
pub use error::*;
pub use evaluation::*;
pub use report::*;
pub use settings::*;
pub use simulation::*;
pub use trials::*;
