//! Sink for transient user-facing notifications.

use crate::board::domain::Notification;
use thiserror::Error;

/// Result type for reading back notifications.
pub type NotifierResult<T> = Result<T, NotifierError>;

/// Displays short-lived messages such as "failed to update task".
#[cfg_attr(test, mockall::automock)]
pub trait BoardNotifier: Send + Sync {
    /// Shows a notification. Must not block.
    fn notify(&self, notification: Notification);
}

/// Errors raised by notifier implementations that keep what they showed.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The notification history could not be read.
    #[error("notification history unavailable: {0}")]
    Unavailable(String),
}
