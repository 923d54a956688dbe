//! Error type for the fallible edges of the engine: configuration loading,
//! map lookup and snapshot encoding. Ticking never fails.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown map preset `{0}`")]
    UnknownMap(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[source] serde_json::Error),

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[source] serde_json::Error),
}
