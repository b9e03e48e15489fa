//! Error types for the log query service.

use thiserror::Error;

/// Errors raised by the log query service.
///
/// Malformed query options never produce an error; they are normalized to
/// defaults instead. The only failures originate from configuration.
#[derive(Debug, Error)]
pub enum LogQueryError {
    /// No logger adapter was configured for the service.
    #[error("logger adapter is not available")]
    AdapterUnavailable,

    /// The opaque adapter configuration block could not be deserialized.
    #[error("invalid adapter options: {0}")]
    InvalidAdapterOptions(#[from] serde_json::Error),

    /// The adapter configuration parsed but holds an unusable value.
    #[error("invalid adapter configuration: {0}")]
    InvalidAdapterConfig(String),
}

impl LogQueryError {
    /// Returns true if the caller can recover by retrying.
    ///
    /// Every variant describes a deployment defect, so this is always false.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::AdapterUnavailable
            | Self::InvalidAdapterOptions(_)
            | Self::InvalidAdapterConfig(_) => false,
        }
    }
}

/// Result type alias for log query operations.
pub type Result<T> = std::result::Result<T, LogQueryError>;
