//! Error types for delay queue operations.

use thiserror::Error;

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Delay queue errors.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// No entry found for the given job key.
    #[error("Queue entry not found: {0}")]
    EntryNotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error.
    #[error("Queue error: {0}")]
    Other(String),
}
