//! Error types for the core domain

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    #[error("Duplicate component: {0}")]
    DuplicateComponent(String),

    #[error("Duplicate relationship: {from} -> {to} ({rel_type})")]
    DuplicateRelationship {
        from: String,
        to: String,
        rel_type: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
