//! Error types for studytrack-core

use thiserror::Error;

/// Main error type for the studytrack-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Write-boundary validation failure
    #[error("validation error: {0}")]
    Validation(String),

    /// User not found
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Username already taken
    #[error("username already taken: {0}")]
    UsernameTaken(String),

    /// No group matches the given invite code or id
    #[error("group not found: {0}")]
    GroupNotFound(String),

    /// Group already has the maximum number of members
    #[error("group is full: {0}")]
    GroupFull(String),

    /// User already belongs to a group
    #[error("user already belongs to a group: {0}")]
    AlreadyInGroup(String),

    /// User does not belong to any group
    #[error("user does not belong to a group: {0}")]
    NotInGroup(String),

    /// Study log not found
    #[error("study log not found: {0}")]
    LogNotFound(String),
}

/// Result type alias for studytrack-core
pub type Result<T> = std::result::Result<T, Error>;
