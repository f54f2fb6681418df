//! Audit entries and user-facing notifications produced by board moves.

use super::{ActorId, ProjectId, Task, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of audit event appended after a committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// The task moved into `done`.
    TaskCompleted,
    /// The task moved between any other columns.
    TaskStatusChanged,
}

impl ActivityKind {
    /// Chooses the event kind for a move into `new_status`.
    #[must_use]
    pub const fn for_transition(new_status: TaskStatus) -> Self {
        match new_status {
            TaskStatus::Done => Self::TaskCompleted,
            TaskStatus::Todo | TaskStatus::InProgress => Self::TaskStatusChanged,
        }
    }

    /// Returns the canonical event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskCompleted => "task_completed",
            Self::TaskStatusChanged => "task_status_changed",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event payload describing the move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityMetadata {
    /// Column before the move.
    pub old_status: TaskStatus,
    /// Column after the move.
    pub new_status: TaskStatus,
    /// Task title at commit time.
    pub title: String,
}

/// One append-only audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// User who performed the move.
    pub actor_id: ActorId,
    /// Project owning the task.
    pub project_id: ProjectId,
    /// Task that moved.
    pub task_id: TaskId,
    /// Event kind.
    pub kind: ActivityKind,
    /// Event payload.
    pub metadata: ActivityMetadata,
}

impl ActivityEntry {
    /// Builds the audit record for a committed move of `task` out of
    /// `old_status`.
    #[must_use]
    pub fn for_move(actor_id: ActorId, task: &Task, old_status: TaskStatus) -> Self {
        Self {
            actor_id,
            project_id: task.project_id(),
            task_id: task.id(),
            kind: ActivityKind::for_transition(task.status()),
            metadata: ActivityMetadata {
                old_status,
                new_status: task.status(),
                title: task.title().to_owned(),
            },
        }
    }
}

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    /// An operation failed and was reverted.
    Error,
}

/// Short-lived message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Human-readable text.
    pub message: String,
    /// Task the notification refers to, if any.
    pub task_id: Option<TaskId>,
}

impl Notification {
    /// Creates an error notification about a task.
    #[must_use]
    pub fn error(message: impl Into<String>, task_id: TaskId) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            task_id: Some(task_id),
        }
    }
}
