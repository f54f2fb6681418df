//! Ephemeral state of one drag gesture.

use super::{HoverTarget, OriginSnapshot, TaskId};
use serde::Serialize;

/// Tracks the task being dragged between drag start and drag end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DragSession {
    dragged_task_id: TaskId,
    origin: OriginSnapshot,
    hover_target: Option<HoverTarget>,
}

impl DragSession {
    /// Opens a session for `dragged_task_id` at its current placement.
    #[must_use]
    pub const fn new(dragged_task_id: TaskId, origin: OriginSnapshot) -> Self {
        Self {
            dragged_task_id,
            origin,
            hover_target: None,
        }
    }

    /// Returns the task being dragged.
    #[must_use]
    pub const fn dragged_task_id(&self) -> TaskId {
        self.dragged_task_id
    }

    /// Returns the placement captured at drag start.
    #[must_use]
    pub const fn origin(&self) -> OriginSnapshot {
        self.origin
    }

    /// Returns the last established hover target.
    #[must_use]
    pub const fn hover_target(&self) -> Option<HoverTarget> {
        self.hover_target
    }

    /// Records a hover target. Returns `false` when it repeats the current one.
    pub fn hover(&mut self, target: HoverTarget) -> bool {
        if self.hover_target == Some(target) {
            return false;
        }
        self.hover_target = Some(target);
        true
    }
}
