//! Error types for job store operations.

use thiserror::Error;

/// Result type for job store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Job store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// No job with the given id.
    #[error("job not found: {0}")]
    JobNotFound(uuid::Uuid),

    /// No user with the given id.
    #[error("user not found: {0}")]
    UserNotFound(uuid::Uuid),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
