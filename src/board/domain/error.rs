//! Error types for board domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain board values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The progress percentage is outside `0..=100`.
    #[error("invalid progress {0}, expected a percentage between 0 and 100")]
    InvalidProgress(u8),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// The hover token is neither a column token nor a task identifier.
    #[error("invalid hover target '{0}', expected a column token or task id")]
    InvalidHoverTarget(String),
}

/// Error returned while parsing task statuses from column tokens or storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
