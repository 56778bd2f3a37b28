//! Core error types for kora-core.
//!
//! All conditions here are local and recoverable. Nothing in the library
//! panics on bad input; callers decide how to surface each variant.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for kora-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Bad caller input (non-positive amounts, blank text, ...)
    #[error("Invalid argument '{field}': {message}")]
    InvalidArgument { field: String, message: String },

    /// Unknown node, quest or journal entry
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// Unlock-order violation on the journey chain
    #[error("Node '{id}' is locked: complete '{requires}' first")]
    NodeLocked { id: String, requires: String },

    /// Key-value backend read/write failure
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// The static skill catalog is malformed
    #[error("Invalid catalog: {0}")]
    Catalog(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CoreError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn not_found(kind: &str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind: kind.to_string(),
            id: id.into(),
        }
    }
}

/// Key-value backend errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite query or connection failure
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem failure (data directory, database file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be serialized for writing
    #[error("Failed to serialize value for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Backend refused the operation
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration schema
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_locked_message_names_prerequisite() {
        let err = CoreError::NodeLocked {
            id: "adhd-3".into(),
            requires: "adhd-2".into(),
        };
        assert_eq!(
            err.to_string(),
            "Node 'adhd-3' is locked: complete 'adhd-2' first"
        );
    }

    #[test]
    fn store_error_converts_into_persistence() {
        let err: CoreError = StoreError::Unavailable("quota exceeded".into()).into();
        assert!(matches!(err, CoreError::Persistence(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }
}
