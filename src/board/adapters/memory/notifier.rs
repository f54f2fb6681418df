//! In-memory notification sink.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use crate::board::{
    domain::Notification,
    ports::{BoardNotifier, NotifierError, NotifierResult},
};

/// Collects notifications so tests can assert on what the user saw.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotifier {
    shown: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryNotifier {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns notifications shown so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Unavailable`] if the history lock is
    /// poisoned.
    pub fn shown(&self) -> NotifierResult<Vec<Notification>> {
        let shown = self
            .shown
            .lock()
            .map_err(|err| NotifierError::Unavailable(err.to_string()))?;
        Ok(shown.clone())
    }
}

impl BoardNotifier for InMemoryNotifier {
    fn notify(&self, notification: Notification) {
        let mut shown = self.shown.lock().unwrap_or_else(|err| {
            warn!("notification history poisoned, recording anyway");
            PoisonError::into_inner(err)
        });
        shown.push(notification);
    }
}
