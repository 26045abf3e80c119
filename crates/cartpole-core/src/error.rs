//! Error types for cartpole

use thiserror::Error;

/// Main error type for cartpole
#[derive(Error, Debug)]
pub enum CartPoleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown state key: {0}")]
    UnknownStateKey(String),

    #[error("Invalid action index {index} (action set has {count} actions)")]
    InvalidAction { index: usize, count: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for cartpole operations
pub type Result<T> = std::result::Result<T, CartPoleError>;
