//! Port contracts for the board's external collaborators.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod gateway;
pub mod notifier;
pub mod recorder;

pub use gateway::{GatewayError, GatewayResult, TaskGateway};
pub use notifier::{BoardNotifier, NotifierError, NotifierResult};
pub use recorder::{ActivityRecorder, RecorderError, RecorderResult};
