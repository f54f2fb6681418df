//! In-memory adapter implementations.
//!
//! These adapters provide simple, thread-safe implementations suitable for
//! tests and for boards that are not yet backed by a remote store.

mod gateway;
mod notifier;
mod recorder;

pub use gateway::InMemoryTaskGateway;
pub use notifier::InMemoryNotifier;
pub use recorder::InMemoryActivityRecorder;
