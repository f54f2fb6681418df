//! Task entity, status column and progress types.

use super::{ActorId, BoardDomainError, ParseTaskStatusError, ProjectId, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board column a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    Todo,
    /// Work is underway.
    InProgress,
    /// Work is finished.
    Done,
}

impl TaskStatus {
    /// Every status in rendering order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Returns the canonical column token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Progress(u8);

impl Progress {
    /// No work recorded.
    pub const NONE: Self = Self(0);

    /// Fully complete; forced whenever a task enters [`TaskStatus::Done`].
    pub const COMPLETE: Self = Self(100);

    /// Creates a validated progress value.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidProgress`] when the value exceeds
    /// 100.
    pub const fn new(value: u8) -> Result<Self, BoardDomainError> {
        if value > 100 {
            return Err(BoardDomainError::InvalidProgress(value));
        }
        Ok(Self(value))
    }

    /// Returns the percentage.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Progress {
    type Error = BoardDomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Progress> for u8 {
    fn from(progress: Progress) -> Self {
        progress.0
    }
}

/// What happens to progress when a task moves out of [`TaskStatus::Done`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", content = "value", rename_all = "snake_case")]
pub enum ReopenProgress {
    /// Leave progress untouched (usually 100).
    #[default]
    Keep,
    /// Reset progress to the given value.
    Reset(Progress),
}

/// Relative urgency of a task. Carried as payload only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal priority.
    #[default]
    Medium,
    /// Should be picked up soon.
    High,
    /// Needs attention now.
    Urgent,
}

/// Descriptive task payload that the board state machine never inspects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    title: String,
    description: Option<String>,
    priority: TaskPriority,
    assignee: Option<ActorId>,
    tags: Vec<String>,
    estimated_minutes: Option<u32>,
}

impl TaskDetails {
    /// Creates task details with a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTaskTitle`] when the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyTaskTitle);
        }

        Ok(Self {
            title: trimmed.to_owned(),
            description: None,
            priority: TaskPriority::default(),
            assignee: None,
            tags: Vec::new(),
            estimated_minutes: None,
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: ActorId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Sets the duration estimate in minutes.
    #[must_use]
    pub const fn with_estimated_minutes(mut self, minutes: u32) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<ActorId> {
        self.assignee
    }

    /// Returns the tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the duration estimate in minutes, if any.
    #[must_use]
    pub const fn estimated_minutes(&self) -> Option<u32> {
        self.estimated_minutes
    }
}

/// Column placement captured when a drag starts, used for rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginSnapshot {
    /// Status at drag start.
    pub status: TaskStatus,
    /// Order index at drag start.
    pub order_index: i64,
    /// Progress at drag start.
    pub progress: Progress,
    /// Last update timestamp at drag start.
    pub updated_at: DateTime<Utc>,
}

/// A unit of work shown on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    status: TaskStatus,
    order_index: i64,
    progress: Progress,
    details: TaskDetails,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a task received from a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted order index.
    pub order_index: i64,
    /// Persisted progress.
    pub progress: Progress,
    /// Persisted payload.
    pub details: TaskDetails,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `todo` task at order index 0 with no progress.
    #[must_use]
    pub fn new(project_id: ProjectId, details: TaskDetails, clock: &impl Clock) -> Self {
        Self {
            id: TaskId::new(),
            project_id,
            status: TaskStatus::Todo,
            order_index: 0,
            progress: Progress::NONE,
            details,
            updated_at: clock.utc(),
        }
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// A persisted `done` task always reports full progress.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        let progress = if data.status == TaskStatus::Done {
            Progress::COMPLETE
        } else {
            data.progress
        };
        Self {
            id: data.id,
            project_id: data.project_id,
            status: data.status,
            order_index: data.order_index,
            progress,
            details: data.details,
            updated_at: data.updated_at,
        }
    }

    /// Places the task in a column, forcing progress for `done`.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        if matches!(status, TaskStatus::Done) {
            self.progress = Progress::COMPLETE;
        }
        self
    }

    /// Sets the order index.
    #[must_use]
    pub const fn with_order_index(mut self, order_index: i64) -> Self {
        self.order_index = order_index;
        self
    }

    /// Sets progress. Ignored for `done` tasks, which are always complete.
    #[must_use]
    pub const fn with_progress(mut self, progress: Progress) -> Self {
        if !matches!(self.status, TaskStatus::Done) {
            self.progress = progress;
        }
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the board column.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the sort position within the column.
    #[must_use]
    pub const fn order_index(&self) -> i64 {
        self.order_index
    }

    /// Returns the completion percentage.
    #[must_use]
    pub const fn progress(&self) -> Progress {
        self.progress
    }

    /// Returns the descriptive payload.
    #[must_use]
    pub const fn details(&self) -> &TaskDetails {
        &self.details
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.details.title()
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Captures the placement needed to undo a move.
    #[must_use]
    pub const fn origin_snapshot(&self) -> OriginSnapshot {
        OriginSnapshot {
            status: self.status,
            order_index: self.order_index,
            progress: self.progress,
            updated_at: self.updated_at,
        }
    }

    /// Moves the task to `status`.
    ///
    /// Entering `done` forces progress to 100. Leaving `done` applies the
    /// `reopen` policy. Returns `false` without touching the task when it is
    /// already in `status`.
    pub fn move_to(&mut self, status: TaskStatus, reopen: ReopenProgress, clock: &impl Clock) -> bool {
        if self.status == status {
            return false;
        }

        if status == TaskStatus::Done {
            self.progress = Progress::COMPLETE;
        } else if let (TaskStatus::Done, ReopenProgress::Reset(progress)) = (self.status, reopen) {
            self.progress = progress;
        }
        self.status = status;
        self.updated_at = clock.utc();
        true
    }

    /// Sets the order index in place.
    pub const fn set_order_index(&mut self, order_index: i64) {
        self.order_index = order_index;
    }

    /// Restores the placement captured by [`Task::origin_snapshot`].
    pub const fn restore(&mut self, snapshot: OriginSnapshot) {
        self.status = snapshot.status;
        self.order_index = snapshot.order_index;
        self.progress = snapshot.progress;
        self.updated_at = snapshot.updated_at;
    }
}
