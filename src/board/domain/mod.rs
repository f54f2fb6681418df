//! Domain model for the Kanban board.
//!
//! Tasks, the per-board store, column partitioning, drag sessions and gesture
//! disambiguation. Nothing here performs I/O.

mod activity;
mod error;
mod gesture;
mod hover;
mod ids;
mod partition;
mod session;
mod store;
mod task;

pub use activity::{ActivityEntry, ActivityKind, ActivityMetadata, Notification, NotificationLevel};
pub use error::{BoardDomainError, ParseTaskStatusError};
pub use gesture::{ActivationConstraint, GestureEvent, GestureRelease, GestureTracker, Point};
pub use hover::HoverTarget;
pub use ids::{ActorId, ProjectId, TaskId};
pub use partition::{BoardColumns, BoardFilter, partition};
pub use session::DragSession;
pub use store::{SharedTaskStore, StoreLockError, TaskEntry, TaskStore};
pub use task::{
    OriginSnapshot, PersistedTaskData, Progress, ReopenProgress, Task, TaskDetails, TaskPriority,
    TaskStatus,
};
