//! Error types for lock operations.

use std::time::Duration;

use thiserror::Error;

/// Result type for lock operations.
pub type LockResult<T> = Result<T, LockError>;

/// Errors that can occur during lock operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// The target lacks a namespace or an id, so no key can be formed.
    #[error("Missing lock information: namespace={namespace:?} id={id:?}")]
    MissingInformation { namespace: String, id: String },

    /// A bounded acquisition did not complete in time.
    #[error("Timed out after {timeout:?} waiting for lock {key}")]
    Timeout { key: String, timeout: Duration },

    /// The locker was closed while waiting.
    #[error("Locker closed while waiting for lock {0}")]
    Closed(String),

    /// Invalid backend configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend error (database, network, etc.)
    #[error("Backend error: {0}")]
    Backend(#[from] sqlx::Error),
}

impl LockError {
    /// Returns true if this is a bounded-wait timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, LockError::Timeout { .. })
    }
}
