//! Error type for the family graph engine and its collaborators

use thiserror::Error;

/// Main error type for the family graph
#[derive(Error, Debug)]
pub enum GraphError {
    /// A person id did not resolve in the store
    #[error("Person not found: {0}")]
    PersonNotFound(String),

    /// A user id or email did not resolve in the store
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Any other record (pending addition, claim) did not resolve
    #[error("Not found: {0}")]
    NotFound(String),

    /// Visibility or edit authorization failed
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Self-loop or duplicate edge
    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),

    /// Workflow rule violated (validation requests, profile claims, input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Caller could not be authenticated
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// File system I/O errors from the store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record (de)serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient Result type using GraphError
pub type GraphResult<T> = std::result::Result<T, GraphError>;
