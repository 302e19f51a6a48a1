//! Keygate error types.

use thiserror::Error;

/// Errors that can occur while issuing, storing or checking access keys.
///
/// An expired or unknown key is not an error: it is a
/// [`KeyStatus`](crate::KeyStatus) outcome.
#[derive(Debug, Error)]
pub enum KeyGateError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The store refused a new record because it is at capacity.
    #[error("Key store is full ({limit} records)")]
    StoreFull {
        /// Configured record limit.
        limit: usize,
    },

    /// A record would expire at or before its creation time.
    #[error("Key record must expire after it is created")]
    InvalidExpiry,

    /// A record with the same value is already stored.
    #[error("Key value already exists")]
    DuplicateKey,

    /// Every generation attempt produced a value that was already taken.
    #[error("Could not generate a unique key after {attempts} attempts")]
    KeyCollision {
        /// Number of values drawn before giving up.
        attempts: u32,
    },

    /// No key provided.
    #[error("No key provided")]
    MissingKey,

    /// HTTP transport error talking to a keygate server.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response body could not be understood.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The server answered with a non-success status.
    #[error("Server returned {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, if any.
        message: String,
    },
}

impl KeyGateError {
    /// Whether this error is an internal storage fault rather than bad input.
    pub fn is_storage_fault(&self) -> bool {
        matches!(
            self,
            Self::StoreFull { .. } | Self::InvalidExpiry | Self::DuplicateKey | Self::KeyCollision { .. }
        )
    }
}
