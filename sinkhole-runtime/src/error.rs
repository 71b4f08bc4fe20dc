//! Runtime errors

use sinkhole_core::CoreError;
use sinkhole_net::NetworkError;
use thiserror::Error;

/// Errors from configuring, running or reporting a detection
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Settings encode error: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Report serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Trial task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
