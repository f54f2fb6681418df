//! Drop targets reported by the pointer-input layer.

use super::{BoardDomainError, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element currently under the pointer during a drag.
///
/// The input layer reports a single string that is either a column token or a
/// task id; [`HoverTarget::parse`] resolves it once so the controller only
/// ever switches on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum HoverTarget {
    /// Empty area of a column.
    Column(TaskStatus),
    /// Another task card.
    Task(TaskId),
}

impl HoverTarget {
    /// Resolves a raw drop-target token.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidHoverTarget`] when the token is
    /// neither a column token nor a task UUID.
    ///
    /// # Examples
    ///
    /// ```
    /// use taskboard::board::domain::{HoverTarget, TaskStatus};
    ///
    /// let target = HoverTarget::parse("in_progress").expect("column token");
    /// assert_eq!(target, HoverTarget::Column(TaskStatus::InProgress));
    /// ```
    pub fn parse(token: &str) -> Result<Self, BoardDomainError> {
        if let Ok(status) = TaskStatus::try_from(token) {
            return Ok(Self::Column(status));
        }
        token
            .parse::<TaskId>()
            .map(Self::Task)
            .map_err(|_| BoardDomainError::InvalidHoverTarget(token.to_owned()))
    }
}

impl From<TaskStatus> for HoverTarget {
    fn from(status: TaskStatus) -> Self {
        Self::Column(status)
    }
}

impl From<TaskId> for HoverTarget {
    fn from(task_id: TaskId) -> Self {
        Self::Task(task_id)
    }
}

impl fmt::Display for HoverTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(status) => write!(f, "column:{status}"),
            Self::Task(task_id) => write!(f, "task:{task_id}"),
        }
    }
}
