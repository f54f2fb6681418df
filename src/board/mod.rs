//! Kanban board interaction core.
//!
//! Dragging a task card between the `todo`, `in_progress` and `done` columns
//! updates the board optimistically, commits the status change to the remote
//! store, and rolls back if that write fails. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
