//! Shared helpers for in-memory board integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskflow::{
    board::{
        adapters::memory::{InMemoryRecordStore, RecordingNotifier, StoreOperation},
        domain::{Task, TaskDraft},
        services::TaskWorkflowController,
    },
    config::BoardConfig,
};

/// Controller type wired to the in-memory adapters.
pub type Controller = TaskWorkflowController<InMemoryRecordStore, RecordingNotifier, DefaultClock>;

/// A controller together with the adapters it was built from.
pub struct Board {
    pub store: Arc<InMemoryRecordStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub controller: Arc<Controller>,
}

/// Provides a controller over an empty in-memory store.
#[fixture]
pub fn board() -> Board {
    let store = Arc::new(InMemoryRecordStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let controller = Arc::new(TaskWorkflowController::new(
        Arc::clone(&store),
        Arc::clone(&notifier),
        Arc::new(DefaultClock),
        BoardConfig::default(),
    ));
    Board {
        store,
        notifier,
        controller,
    }
}

/// Creates one task per title, in order.
///
/// # Errors
///
/// Returns an error if any create fails.
pub async fn create_all(controller: &Controller, titles: &[&str]) -> eyre::Result<Vec<Task>> {
    let mut created = Vec::with_capacity(titles.len());
    for title in titles {
        created.push(controller.create_task(&TaskDraft::new(*title)).await?);
    }
    Ok(created)
}

/// Yields until the next call of `operation` is parked on its hold.
///
/// # Errors
///
/// Returns an error if the store state cannot be read.
pub async fn wait_until_held(
    store: &InMemoryRecordStore,
    operation: StoreOperation,
) -> eyre::Result<()> {
    while !store.is_held(operation)? {
        tokio::task::yield_now().await;
    }
    Ok(())
}
