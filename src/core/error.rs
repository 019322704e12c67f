//! Error types and error handling for the soda review service.
//!
//! This module defines the error types used throughout the
//! application. Transport-specific rendering (HTTP status codes and
//! failure bodies) is handled in the `http` adapter.

use thiserror::Error;

/// Result type alias for soda review operations
pub type Result<T> = std::result::Result<T, ReviewError>;

/// Main error type for the soda review service
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("\"{field}\" {message}")]
    Validation { field: String, message: String },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Invalid search type presented: {0}")]
    InvalidSearchMode(String),

    #[error("Error occurred inserting review: {0}")]
    Persistence(String),

    #[error("Error occurred retrieving matches: {0}")]
    Query(String),

    #[error("Store operation '{operation}' timed out after {timeout_ms}ms")]
    StoreTimeout { operation: String, timeout_ms: u64 },

    #[error("Store connection error: {0}")]
    StoreConnection(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl ReviewError {
    /// Build a validation failure for a dotted field path
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ReviewError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            ReviewError::Validation { .. }
                | ReviewError::MalformedPayload(_)
                | ReviewError::InvalidSearchMode(_)
        )
    }

    /// Check if the store failed to answer in time
    pub fn is_timeout(&self) -> bool {
        matches!(self, ReviewError::StoreTimeout { .. })
    }
}
