//! Activity recorder port for the append-only audit log.

use crate::board::domain::ActivityEntry;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for recorder operations.
pub type RecorderResult<T> = Result<T, RecorderError>;

/// Append-only audit log writer.
///
/// Callers treat writes as best effort: a failure never reverts the board
/// change being recorded.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityRecorder: Send + Sync {
    /// Appends one entry.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError`] when the entry could not be written.
    async fn record(&self, entry: &ActivityEntry) -> RecorderResult<()>;
}

/// Errors returned by recorder implementations.
#[derive(Debug, Clone, Error)]
pub enum RecorderError {
    /// The audit backend refused the entry.
    #[error("activity rejected: {0}")]
    Rejected(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RecorderError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
