//! Error types for the detection core

use thiserror::Error;

use crate::NodeId;

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors from configuring the detection core
#[derive(Debug, Error)]
pub enum CoreError {
    /// A colony parameter is outside its valid range
    #[error("Invalid colony config: {0}")]
    InvalidConfig(String),

    /// A node id does not exist in the graph
    #[error("Node {node} out of range (graph has {node_count} nodes)")]
    NodeOutOfRange { node: NodeId, node_count: usize },
}
