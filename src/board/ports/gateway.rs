//! Remote task gateway port.

use crate::board::domain::{Task, TaskId, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Narrow query interface to the remote store that owns tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// Persists a new status and returns the task as stored remotely.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the task does not exist
    /// remotely, [`GatewayError::Rejected`] when the backend refuses the
    /// change, or [`GatewayError::Transport`] on network failure.
    async fn update_status(&self, task_id: TaskId, status: TaskStatus) -> GatewayResult<Task>;

    /// Persists order indices for a set of tasks. `positions[i]` belongs to
    /// `task_ids[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when any task cannot be reordered.
    async fn reorder(&self, task_ids: &[TaskId], positions: &[i64]) -> GatewayResult<()>;

    /// Fetches the remote copy of a task.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the task does not exist.
    async fn get(&self, task_id: TaskId) -> GatewayResult<Task>;
}

/// Errors returned by gateway implementations.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The task does not exist remotely.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The backend refused the change.
    #[error("update rejected: {0}")]
    Rejected(String),

    /// Network or backend failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl GatewayError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
