//! Board behaviour configuration.

use crate::board::domain::{ActivationConstraint, ReopenProgress};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Message shown when a remote commit fails and the move is reverted.
pub const DEFAULT_FAILURE_MESSAGE: &str = "failed to update task";

/// Default upper bound on a remote status update.
pub const DEFAULT_COMMIT_TIMEOUT_MS: u64 = 15_000;

/// Tunables for the drag session controller.
///
/// Every field has a default, so a JSON document only needs the keys it
/// overrides.
///
/// # Examples
///
/// ```
/// use taskboard::board::services::BoardConfig;
///
/// let config = BoardConfig::from_json(r#"{ "commit_timeout_ms": null }"#)
///     .expect("valid config");
/// assert_eq!(config.commit_timeout(), None);
/// assert_eq!(config.activation.distance_px, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// When a press turns into a drag.
    pub activation: ActivationConstraint,
    /// Upper bound on a remote commit in milliseconds; `None` waits
    /// indefinitely.
    pub commit_timeout_ms: Option<u64>,
    /// Progress handling when a task leaves `done`.
    pub reopen_progress: ReopenProgress,
    /// Text of the notification shown after a rollback.
    pub failure_message: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            activation: ActivationConstraint::default(),
            commit_timeout_ms: Some(DEFAULT_COMMIT_TIMEOUT_MS),
            reopen_progress: ReopenProgress::Keep,
            failure_message: DEFAULT_FAILURE_MESSAGE.to_owned(),
        }
    }
}

impl BoardConfig {
    /// Press-and-hold activation suited to touch screens.
    #[must_use]
    pub fn touch() -> Self {
        Self {
            activation: ActivationConstraint::delay(250, 5),
            ..Self::default()
        }
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`BoardConfigError::Parse`] when the document is malformed.
    pub fn from_json(document: &str) -> Result<Self, BoardConfigError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Sets the remote commit timeout.
    #[must_use]
    pub const fn with_commit_timeout(mut self, timeout_ms: Option<u64>) -> Self {
        self.commit_timeout_ms = timeout_ms;
        self
    }

    /// Sets the reopen progress policy.
    #[must_use]
    pub const fn with_reopen_progress(mut self, policy: ReopenProgress) -> Self {
        self.reopen_progress = policy;
        self
    }

    /// Sets the activation constraint.
    #[must_use]
    pub const fn with_activation(mut self, activation: ActivationConstraint) -> Self {
        self.activation = activation;
        self
    }

    /// Returns the commit timeout as a [`Duration`].
    #[must_use]
    pub const fn commit_timeout(&self) -> Option<Duration> {
        match self.commit_timeout_ms {
            Some(ms) => Some(Duration::from_millis(ms)),
            None => None,
        }
    }
}

/// Errors returned while loading board configuration.
#[derive(Debug, Error)]
pub enum BoardConfigError {
    /// The document is not valid configuration JSON.
    #[error("invalid board configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
