//! Shared world state for board drag and drop BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::board::{
    adapters::memory::{InMemoryActivityRecorder, InMemoryNotifier, InMemoryTaskGateway},
    domain::{ActorId, ProjectId, SharedTaskStore, TaskId, TaskStatus},
    services::{BoardPorts, DragOutcome, DragSessionController, GestureOutcome},
};

/// Controller type used by the BDD world.
pub type TestController = DragSessionController<
    InMemoryTaskGateway<DefaultClock>,
    InMemoryActivityRecorder,
    InMemoryNotifier,
    DefaultClock,
>;

/// Scenario world for drag and drop behaviour tests.
pub struct BoardWorld {
    pub controller: TestController,
    pub gateway: Arc<InMemoryTaskGateway<DefaultClock>>,
    pub recorder: Arc<InMemoryActivityRecorder>,
    pub notifier: Arc<InMemoryNotifier>,
    pub project: ProjectId,
    pub labels: HashMap<String, TaskId>,
    pub last_drag: Option<DragOutcome>,
    pub last_gesture: Option<GestureOutcome>,
}

impl BoardWorld {
    /// Creates a world with an empty board.
    #[must_use]
    pub fn new() -> Self {
        let gateway = Arc::new(InMemoryTaskGateway::new(DefaultClock));
        let recorder = Arc::new(InMemoryActivityRecorder::new());
        let notifier = Arc::new(InMemoryNotifier::new());
        let controller = DragSessionController::new(
            SharedTaskStore::default(),
            BoardPorts {
                gateway: Arc::clone(&gateway),
                recorder: Arc::clone(&recorder),
                notifier: Arc::clone(&notifier),
            },
            Arc::new(DefaultClock),
            ActorId::new(),
        );

        Self {
            controller,
            gateway,
            recorder,
            notifier,
            project: ProjectId::new(),
            labels: HashMap::new(),
            last_drag: None,
            last_gesture: None,
        }
    }

    /// Resolves a scenario label to the task it names.
    ///
    /// # Errors
    ///
    /// Returns an error if no task was created under `label`.
    pub fn task_id(&self, label: &str) -> Result<TaskId, eyre::Report> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task labelled {label} in scenario world"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Parses a column token used in feature files.
///
/// # Errors
///
/// Returns an error if `token` is not a column name.
pub fn column(token: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(token).map_err(|err| eyre::eyre!("invalid column in scenario: {err}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
