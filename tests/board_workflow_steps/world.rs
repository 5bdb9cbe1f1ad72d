//! Shared world state for board workflow BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskflow::{
    board::{
        adapters::memory::{InMemoryRecordStore, RecordingNotifier},
        domain::Task,
        services::{TaskWorkflowController, WorkflowError},
    },
    config::BoardConfig,
};

/// Controller type used by the BDD world.
pub type TestController =
    TaskWorkflowController<InMemoryRecordStore, RecordingNotifier, DefaultClock>;

/// Scenario world for board workflow behaviour tests.
pub struct BoardWorld {
    pub store: Arc<InMemoryRecordStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub controller: TestController,
    pub last_result: Option<Result<Task, WorkflowError>>,
}

impl BoardWorld {
    /// Creates a world over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryRecordStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = TaskWorkflowController::new(
            Arc::clone(&store),
            Arc::clone(&notifier),
            Arc::new(DefaultClock),
            BoardConfig::default(),
        );

        Self {
            store,
            notifier,
            controller,
            last_result: None,
        }
    }

    /// Finds a loaded task by title.
    ///
    /// # Errors
    ///
    /// Returns an error when no loaded task has `title`.
    pub fn task_titled(&self, title: &str) -> Result<Task, eyre::Report> {
        self.controller
            .tasks()
            .into_iter()
            .find(|task| task.title() == title)
            .ok_or_else(|| eyre::eyre!("no task titled {title:?} on the board"))
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

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
