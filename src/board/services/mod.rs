//! Application services for board interaction.

mod config;
mod controller;

pub use config::{BoardConfig, BoardConfigError, DEFAULT_COMMIT_TIMEOUT_MS, DEFAULT_FAILURE_MESSAGE};
pub use controller::{
    BoardError, BoardPorts, BoardResult, CommitFailure, DragOutcome, DragOverOutcome,
    DragSessionController, DragStartOutcome, GestureOutcome, ReorderOutcome,
};
