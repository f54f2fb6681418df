//! Click versus drag disambiguation for pointer gestures on task cards.
//!
//! A press becomes a drag only once the activation constraint is satisfied.
//! Until then a release is a click. After activation the click is suppressed
//! for the rest of the gesture.

use super::TaskId;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Pointer position in integer CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn squared_distance_to(self, other: Self) -> u128 {
        let dx = u128::from((i64::from(self.x) - i64::from(other.x)).unsigned_abs());
        let dy = u128::from((i64::from(self.y) - i64::from(other.y)).unsigned_abs());
        dx * dx + dy * dy
    }
}

/// Conditions a press must meet before it is treated as a drag.
///
/// Without a delay, the pointer must travel strictly more than
/// `distance_px`. With a delay, the press must be held for `delay_ms` while
/// staying within `tolerance_px`; leaving the tolerance early aborts the
/// gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationConstraint {
    /// Minimum travel in pixels for distance activation.
    pub distance_px: u32,
    /// Hold time in milliseconds for delay activation.
    pub delay_ms: Option<u64>,
    /// Allowed travel in pixels while waiting for the delay.
    pub tolerance_px: u32,
}

impl Default for ActivationConstraint {
    fn default() -> Self {
        Self {
            distance_px: 8,
            delay_ms: None,
            tolerance_px: 5,
        }
    }
}

impl ActivationConstraint {
    /// Distance-only activation.
    #[must_use]
    pub const fn distance(distance_px: u32) -> Self {
        Self {
            distance_px,
            delay_ms: None,
            tolerance_px: 0,
        }
    }

    /// Press-and-hold activation, as used for touch input.
    #[must_use]
    pub const fn delay(delay_ms: u64, tolerance_px: u32) -> Self {
        Self {
            distance_px: 0,
            delay_ms: Some(delay_ms),
            tolerance_px,
        }
    }

    fn evaluate(self, travelled: u128, held: TimeDelta) -> Activation {
        match self.delay_ms {
            None => {
                let limit = u128::from(self.distance_px);
                if travelled > limit * limit {
                    Activation::Activated
                } else {
                    Activation::Waiting
                }
            }
            Some(delay_ms) => {
                let delay = i64::try_from(delay_ms)
                    .ok()
                    .and_then(TimeDelta::try_milliseconds)
                    .unwrap_or(TimeDelta::MAX);
                let tolerance = u128::from(self.tolerance_px);
                if held >= delay {
                    Activation::Activated
                } else if travelled > tolerance * tolerance {
                    Activation::Aborted
                } else {
                    Activation::Waiting
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activation {
    Waiting,
    Activated,
    Aborted,
}

/// Result of feeding a pointer move to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// Nothing changed.
    None,
    /// The press just became a drag of this task.
    DragActivated(TaskId),
    /// The press moved too early and will produce neither click nor drag.
    Aborted(TaskId),
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureRelease {
    /// The press never became a drag: open the task.
    Click(TaskId),
    /// A drag of this task was released.
    DragEnded(TaskId),
    /// No press was active or the gesture had been aborted.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Pressed {
        task_id: TaskId,
        origin: Point,
        pressed_at: DateTime<Utc>,
    },
    Dragging {
        task_id: TaskId,
    },
    Aborted,
}

/// Per-pointer state machine separating clicks from drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureTracker {
    constraint: ActivationConstraint,
    phase: Phase,
}

impl GestureTracker {
    /// Creates an idle tracker.
    #[must_use]
    pub const fn new(constraint: ActivationConstraint) -> Self {
        Self {
            constraint,
            phase: Phase::Idle,
        }
    }

    /// Returns the activation constraint in force.
    #[must_use]
    pub const fn constraint(&self) -> ActivationConstraint {
        self.constraint
    }

    /// Returns the task being dragged once activation has happened.
    #[must_use]
    pub const fn dragging(&self) -> Option<TaskId> {
        match self.phase {
            Phase::Dragging { task_id } => Some(task_id),
            _ => None,
        }
    }

    /// Starts a gesture on a task card, discarding any previous gesture.
    pub const fn press(&mut self, task_id: TaskId, at_point: Point, at: DateTime<Utc>) {
        self.phase = Phase::Pressed {
            task_id,
            origin: at_point,
            pressed_at: at,
        };
    }

    /// Feeds a pointer move.
    pub fn movement(&mut self, point: Point, at: DateTime<Utc>) -> GestureEvent {
        let Phase::Pressed {
            task_id,
            origin,
            pressed_at,
        } = self.phase
        else {
            return GestureEvent::None;
        };

        let travelled = origin.squared_distance_to(point);
        match self.constraint.evaluate(travelled, at - pressed_at) {
            Activation::Waiting => GestureEvent::None,
            Activation::Activated => {
                self.phase = Phase::Dragging { task_id };
                GestureEvent::DragActivated(task_id)
            }
            Activation::Aborted => {
                self.phase = Phase::Aborted;
                GestureEvent::Aborted(task_id)
            }
        }
    }

    /// Ends the gesture and resets the tracker.
    pub fn release(&mut self, point: Point, at: DateTime<Utc>) -> GestureRelease {
        let outcome = match self.phase {
            Phase::Pressed { task_id, .. } => match self.movement(point, at) {
                GestureEvent::None => GestureRelease::Click(task_id),
                GestureEvent::DragActivated(dragged) => GestureRelease::DragEnded(dragged),
                GestureEvent::Aborted(_) => GestureRelease::Ignored,
            },
            Phase::Dragging { task_id } => GestureRelease::DragEnded(task_id),
            Phase::Idle | Phase::Aborted => GestureRelease::Ignored,
        };
        self.phase = Phase::Idle;
        outcome
    }

    /// Abandons the gesture without producing a click or a drag end.
    pub const fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(ActivationConstraint::default())
    }
}
