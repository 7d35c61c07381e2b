//! Error types for spanstore
//!
//! This module defines the error types shared by all crates.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! The commit path itself reports a boolean outcome; these errors cover
//! configuration loading and the structured form of an aborted commit.

use std::io;
use thiserror::Error;

/// Result type alias for spanstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for spanstore
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (reading a config file)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Configuration could not be parsed or failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Transaction aborted because its read-set no longer matches the store
    #[error("Transaction aborted: {reason}")]
    TransactionAborted {
        /// Human-readable reason for the abort
        reason: String,
    },
}

impl Error {
    /// Build an `InvalidConfig` error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }

    /// True if this error is a commit abort the caller may retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::TransactionAborted { .. })
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}
