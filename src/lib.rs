//! Taskboard: the interaction core of a Kanban project board.
//!
//! This crate owns the part of a task board that has real state-machine
//! semantics: dragging task cards between status columns with immediate
//! optimistic feedback, committing moves to a remote store, and rolling back
//! cleanly when that store refuses.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure board logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the remote store, audit log and
//!   notifications
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`board`]: Task store, column partitioning and the drag session
//!   controller

pub mod board;
