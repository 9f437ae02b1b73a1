//! Store error types.

use thiserror::Error;

/// Document-store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Namespace open/close error
    #[error("Namespace error: {0}")]
    Namespace(String),

    /// Collection open/load error
    #[error("Collection error: {0}")]
    Collection(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Namespace or collection not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
