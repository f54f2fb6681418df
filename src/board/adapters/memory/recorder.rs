//! In-memory activity recorder.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::ActivityEntry,
    ports::{ActivityRecorder, RecorderError, RecorderResult},
};

/// Thread-safe recorder that keeps entries in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActivityRecorder {
    state: Arc<RwLock<RecorderState>>,
}

#[derive(Debug, Default)]
struct RecorderState {
    entries: Vec<ActivityEntry>,
    attempts: usize,
    failure: Option<RecorderError>,
}

fn poisoned(err: &impl ToString) -> RecorderError {
    RecorderError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryActivityRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with `failure`, or succeed again
    /// when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::Persistence`] if the internal lock is
    /// poisoned.
    pub fn set_failure(&self, failure: Option<RecorderError>) -> RecorderResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        state.failure = failure;
        Ok(())
    }

    /// Returns the entries written so far.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::Persistence`] if the internal lock is
    /// poisoned.
    pub fn entries(&self) -> RecorderResult<Vec<ActivityEntry>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(state.entries.clone())
    }

    /// Returns how many writes were attempted, including failed ones.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::Persistence`] if the internal lock is
    /// poisoned.
    pub fn attempts(&self) -> RecorderResult<usize> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(state.attempts)
    }
}

#[async_trait]
impl ActivityRecorder for InMemoryActivityRecorder {
    async fn record(&self, entry: &ActivityEntry) -> RecorderResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        state.attempts += 1;
        if let Some(failure) = state.failure.clone() {
            return Err(failure);
        }
        state.entries.push(entry.clone());
        Ok(())
    }
}
