//! Mail error types.

use thiserror::Error;

/// Result type for mail operations.
pub type Result<T> = std::result::Result<T, MailError>;

/// Mail errors.
#[derive(Debug, Error)]
pub enum MailError {
    /// SMTP connection or submission error.
    #[error("SMTP error: {0}")]
    Smtp(String),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Missing required field.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error.
    #[error("Network error: {0}")]
    Network(String),

    /// Operation timed out.
    #[error("Operation timed out")]
    Timeout,
}

impl MailError {
    /// Whether this error is worth retrying (transient transport trouble),
    /// as opposed to a malformed email that will never succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Smtp(_) | Self::Network(_) | Self::Timeout)
    }
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        Self::Smtp(err.to_string())
    }
}

impl From<lettre::address::AddressError> for MailError {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::InvalidAddress(err.to_string())
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        Self::Smtp(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smtp_and_network_errors_are_retryable() {
        assert!(MailError::Smtp("connection reset".into()).is_retryable());
        assert!(MailError::Network("dns failure".into()).is_retryable());
        assert!(MailError::Timeout.is_retryable());
    }

    #[test]
    fn malformed_email_errors_are_not_retryable() {
        assert!(!MailError::MissingField("subject").is_retryable());
        assert!(!MailError::InvalidAddress("not-an-email".into()).is_retryable());
    }
}
