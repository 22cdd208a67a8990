//! Error types for core algorithms.
//!
//! The core never fails on malformed *content* (unknown ids, missing
//! detections); only malformed *parameters* are rejected, and those are
//! caught at construction time.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors from core component construction.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CoreError {
    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
