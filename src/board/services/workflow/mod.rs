//! Task workflow orchestration.
//!
//! [`TaskWorkflowController`] owns the local read-through cache of the
//! task collection. Every successful mutation is followed by a full
//! reload of the collection from the record store; the local snapshot is
//! replaced, never patched. Failed store calls leave the snapshot at its
//! last known-good state and surface an error notification.

mod catalog;
mod composer;

pub use composer::Composer;

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tokio::sync::watch;

use self::composer::UiState;
use super::{
    BusyFlags, OperationGuard, OperationKey, OperationKind, OperationState, OperationTracker,
    ProjectRegistry, TagRegistry, TaskSnapshot,
    normalizer::{self, Normalizer, TASK_FIELDS},
};
use crate::board::{
    domain::{BoardStats, RecordId, Task, TaskDraft, TaskId, TaskStatus, ValidationError},
    ports::{
        Collection, ListQuery, Notification, Notifier, Record, RecordOutcome, RecordStore,
        RecordStoreError, RecordStoreResult,
    },
    view,
};
use crate::config::{BoardConfig, OrderingConfig};

/// Errors returned by workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// User input was rejected before any store call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A record store call failed.
    #[error("failed to {action}: {source}")]
    Remote {
        /// Attempted action, phrased for the user.
        action: &'static str,
        /// Underlying store error.
        #[source]
        source: RecordStoreError,
    },

    /// The same operation is already in flight for this target.
    #[error("operation already in progress: {0}")]
    Busy(OperationKey),

    /// No task with this identifier is loaded.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The store returned a record that could not be normalized.
    #[error("store returned a malformed {collection} record")]
    MalformedRecord {
        /// Collection the record belongs to.
        collection: Collection,
    },
}

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

const CREATE_TASK: &str = "create task";
const UPDATE_TASK: &str = "update task";
const DELETE_TASK: &str = "delete task";
const MOVE_TASK: &str = "update task status";
const LOAD_TASKS: &str = "load tasks";

/// Orchestrates task mutations against a [`RecordStore`] and keeps the
/// local board state in sync with it.
///
/// Methods take `&self` and may be awaited concurrently. Operations with
/// the same [`OperationKey`] are mutually exclusive; a second start fails
/// fast with [`WorkflowError::Busy`].
pub struct TaskWorkflowController<S, N, C = DefaultClock>
where
    S: RecordStore,
    N: Notifier,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    notifier: Arc<N>,
    clock: Arc<C>,
    normalizer: Normalizer,
    ordering: OrderingConfig,
    snapshot: TaskSnapshot,
    operations: OperationTracker,
    ui: Mutex<UiState>,
    tags: RwLock<TagRegistry>,
    projects: RwLock<ProjectRegistry>,
    stats: watch::Sender<BoardStats>,
}

impl<S, N, C> TaskWorkflowController<S, N, C>
where
    S: RecordStore,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates a controller with an empty snapshot.
    ///
    /// Call [`Self::load`] to populate it from the store.
    #[must_use]
    pub fn new(store: Arc<S>, notifier: Arc<N>, clock: Arc<C>, config: BoardConfig) -> Self {
        let (stats, _) = watch::channel(BoardStats::default());
        Self {
            store,
            notifier,
            clock,
            normalizer: Normalizer::new(config.default_color),
            ordering: config.ordering,
            snapshot: TaskSnapshot::new(),
            operations: OperationTracker::new(),
            ui: Mutex::new(UiState::default()),
            tags: RwLock::new(TagRegistry::new()),
            projects: RwLock::new(ProjectRegistry::new()),
            stats,
        }
    }

    /// Loads tasks, projects, and tags.
    ///
    /// # Errors
    ///
    /// Returns the first [`WorkflowError::Remote`] among the three loads.
    /// Collections that loaded successfully are kept.
    pub async fn load(&self) -> WorkflowResult<()> {
        let (tasks, projects, tags) =
            tokio::join!(self.reload_tasks(), self.load_projects(), self.load_tags());
        tasks?;
        projects?;
        tags?;
        Ok(())
    }

    /// Invalidates the task snapshot and reloads it from the store.
    ///
    /// The reload takes a ticket before querying; its result is installed
    /// only when no newer reload has been installed in the meantime.
    /// Returns `true` when the result was installed.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Remote`] when the store query fails; the
    /// snapshot is left unchanged.
    pub async fn reload_tasks(&self) -> WorkflowResult<bool> {
        let ticket = self.snapshot.issue_ticket();
        let query = ListQuery::new()
            .with_fields(TASK_FIELDS)
            .ordered_by(self.ordering.tasks.clone());
        let records = self
            .store
            .list(Collection::Tasks, &query)
            .await
            .map_err(|source| self.report_remote(LOAD_TASKS, source))?;

        let tasks = self.normalizer.tasks(records);
        let count = tasks.len();
        if self.snapshot.install(ticket, tasks) {
            tracing::debug!(version = ticket.value(), count, "installed task snapshot");
            self.publish_stats();
            Ok(true)
        } else {
            tracing::debug!(
                ticket = ticket.value(),
                installed = self.snapshot.version(),
                "discarding stale task snapshot"
            );
            Ok(false)
        }
    }

    /// Creates a task from `draft`.
    ///
    /// On success the collection is reloaded, the composer is reset and
    /// closed, and the stored task is returned.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Validation`] for a blank title (no store
    /// call is made), [`WorkflowError::Busy`] while another create is in
    /// flight, and [`WorkflowError::Remote`] when the store fails.
    pub async fn create_task(&self, draft: &TaskDraft) -> WorkflowResult<Task> {
        self.check_draft(draft)?;
        let guard = self.begin(OperationKey::untargeted(OperationKind::CreateTask))?;

        let record = normalizer::task_record(draft, self.clock.utc());
        let stored = match self.create_one(Collection::Tasks, record).await {
            Ok(stored) => stored,
            Err(source) => return Err(self.fail(guard, CREATE_TASK, source)),
        };

        let task = self.settle_task(guard, CREATE_TASK, &stored).await?;
        tracing::info!(task_id = %task.id(), "task created");
        self.notifier
            .notify(Notification::success("Task created successfully"));
        self.lock_ui().reset_composer();
        Ok(task)
    }

    /// Replaces every field of task `id` with the contents of `draft`.
    ///
    /// The completion timestamp is recomputed from the draft status.
    ///
    /// # Errors
    ///
    /// As for [`Self::create_task`]; the busy check is per task.
    pub async fn update_task(&self, id: &TaskId, draft: &TaskDraft) -> WorkflowResult<Task> {
        self.check_draft(draft)?;
        let guard = self.begin(OperationKey::targeted(OperationKind::UpdateTask, id.clone()))?;

        let record = normalizer::task_update_record(id, draft, self.clock.utc());
        let stored = match self.update_one(Collection::Tasks, record).await {
            Ok(stored) => stored,
            Err(source) => return Err(self.fail(guard, UPDATE_TASK, source)),
        };

        let task = self.settle_task(guard, UPDATE_TASK, &stored).await?;
        tracing::info!(task_id = %task.id(), "task updated");
        self.notifier
            .notify(Notification::success("Task updated successfully"));
        self.lock_ui().reset_composer();
        Ok(task)
    }

    /// Deletes task `id`.
    ///
    /// Closes the detail view and the composer when they show the deleted
    /// task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Busy`] while a delete of the same task is in
    /// flight and [`WorkflowError::Remote`] when the store fails or does not
    /// acknowledge the deletion.
    pub async fn delete_task(&self, id: &TaskId) -> WorkflowResult<()> {
        let guard = self.begin(OperationKey::targeted(OperationKind::DeleteTask, id.clone()))?;

        let ids = [id.record_id().clone()];
        match self.store.delete(Collection::Tasks, &ids).await {
            Ok(true) => {}
            Ok(false) => {
                let source = RecordStoreError::rejected(
                    Collection::Tasks,
                    format!("task {id} was not deleted"),
                );
                return Err(self.fail(guard, DELETE_TASK, source));
            }
            Err(source) => return Err(self.fail(guard, DELETE_TASK, source)),
        }

        self.refresh_after_write().await;
        self.lock_ui().forget_task(id);
        guard.succeed();
        tracing::info!(task_id = %id, "task deleted");
        self.notifier
            .notify(Notification::success("Task deleted successfully"));
        Ok(())
    }

    /// Moves task `id` to `status`.
    ///
    /// The completion timestamp is set to now when `status` is done and
    /// cleared otherwise, also when the task already has that status.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Busy`] while a status change of the same
    /// task is in flight and [`WorkflowError::Remote`] when the store fails.
    pub async fn change_status(&self, id: &TaskId, status: TaskStatus) -> WorkflowResult<Task> {
        let guard =
            self.begin(OperationKey::targeted(OperationKind::ChangeStatus, id.clone()))?;

        let record = normalizer::status_record(id, status, self.clock.utc());
        let stored = match self.update_one(Collection::Tasks, record).await {
            Ok(stored) => stored,
            Err(source) => return Err(self.fail(guard, MOVE_TASK, source)),
        };

        let task = self.settle_task(guard, MOVE_TASK, &stored).await?;
        tracing::info!(task_id = %id, status = %status, "task moved");
        self.notifier
            .notify(Notification::info(format!("Task moved to {}", status.label())));
        Ok(task)
    }

    /// Handles a drop of a dragged card onto `column`.
    ///
    /// `payload` carries the dragged task identifier. An empty payload is
    /// ignored and yields `Ok(None)` without a store call.
    ///
    /// # Errors
    ///
    /// As for [`Self::change_status`].
    pub async fn drop_task(
        &self,
        payload: &str,
        column: TaskStatus,
    ) -> WorkflowResult<Option<Task>> {
        let Ok(id) = TaskId::new(payload) else {
            tracing::debug!(column = %column, "ignoring drop without a task identifier");
            return Ok(None);
        };
        self.change_status(&id, column).await.map(Some)
    }

    /// Subscribes to board statistics.
    ///
    /// The receiver observes a new value every time a snapshot is
    /// installed.
    #[must_use]
    pub fn subscribe_stats(&self) -> watch::Receiver<BoardStats> {
        self.stats.subscribe()
    }

    /// Returns the most recently published statistics.
    #[must_use]
    pub fn stats(&self) -> BoardStats {
        *self.stats.borrow()
    }

    /// Recomputes and publishes statistics for the current time.
    ///
    /// Overdue counts change as time passes even when the collection does
    /// not.
    pub fn refresh_stats(&self) {
        self.publish_stats();
    }

    /// Returns the full, unfiltered task collection in store order.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.snapshot.tasks()
    }

    /// Returns the loaded task with `id`.
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<Task> {
        self.snapshot.find(id)
    }

    /// Returns the tasks passing the active filter, in store order.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<Task> {
        let filter = self.filter();
        self.snapshot.with_tasks(|tasks| {
            view::visible_tasks(tasks, &filter)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    /// Returns the tasks shown in the board column for `status`.
    ///
    /// Only the priority and text predicates of the active filter apply.
    #[must_use]
    pub fn board_column(&self, status: TaskStatus) -> Vec<Task> {
        let filter = self.filter();
        self.snapshot.with_tasks(|tasks| {
            view::partition(tasks)
                .column_view(status, &filter)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    /// Returns the state of one operation.
    #[must_use]
    pub fn operation_state(
        &self,
        kind: OperationKind,
        target: Option<RecordId>,
    ) -> OperationState {
        self.operations.state(&OperationKey { kind, target })
    }

    /// Returns the per-control busy flags.
    #[must_use]
    pub fn busy_flags(&self) -> BusyFlags {
        self.operations.busy_flags()
    }

    fn check_draft(&self, draft: &TaskDraft) -> WorkflowResult<()> {
        draft.validate().map_err(|err| self.reject(err))
    }

    fn reject(&self, err: ValidationError) -> WorkflowError {
        tracing::debug!(error = %err, "rejecting invalid input");
        self.notifier.notify(Notification::error(err.user_message()));
        WorkflowError::Validation(err)
    }

    fn begin(&self, key: OperationKey) -> WorkflowResult<OperationGuard<'_>> {
        let Some(guard) = self.operations.begin(key.clone()) else {
            tracing::debug!(operation = %key, "operation already in flight");
            return Err(WorkflowError::Busy(key));
        };
        Ok(guard)
    }

    fn report_remote(&self, action: &'static str, source: RecordStoreError) -> WorkflowError {
        tracing::warn!(action, error = %source, "record store call failed");
        self.notifier
            .notify(Notification::error(format!("Failed to {action}")));
        WorkflowError::Remote { action, source }
    }

    fn fail(
        &self,
        guard: OperationGuard<'_>,
        action: &'static str,
        source: RecordStoreError,
    ) -> WorkflowError {
        guard.fail(source.to_string());
        self.report_remote(action, source)
    }

    /// Reports a write the store accepted but answered with a record that
    /// does not normalize.
    fn malformed(
        &self,
        guard: OperationGuard<'_>,
        action: &'static str,
        collection: Collection,
    ) -> WorkflowError {
        guard.fail(format!("store returned a malformed {collection} record"));
        tracing::warn!(action, %collection, "store returned a malformed record");
        self.notifier
            .notify(Notification::error(format!("Failed to {action}")));
        WorkflowError::MalformedRecord { collection }
    }

    /// Reloads after a successful write. A failed reload has already been
    /// reported and leaves the previous snapshot in place.
    async fn refresh_after_write(&self) {
        if self.reload_tasks().await.is_err() {
            tracing::debug!("keeping previous task snapshot after failed reload");
        }
    }

    /// Reloads after a task write and resolves the written task, preferring
    /// the freshly installed snapshot over the raw store response.
    async fn settle_task(
        &self,
        guard: OperationGuard<'_>,
        action: &'static str,
        stored: &Record,
    ) -> WorkflowResult<Task> {
        self.refresh_after_write().await;
        let Some(written) = self.normalizer.task(stored) else {
            return Err(self.malformed(guard, action, Collection::Tasks));
        };
        guard.succeed();
        Ok(self.snapshot.find(written.id()).unwrap_or(written))
    }

    async fn create_one(
        &self,
        collection: Collection,
        record: Record,
    ) -> RecordStoreResult<Record> {
        let outcomes = self.store.create(collection, vec![record]).await?;
        single_outcome(collection, outcomes)
    }

    async fn update_one(
        &self,
        collection: Collection,
        record: Record,
    ) -> RecordStoreResult<Record> {
        let outcomes = self.store.update(collection, vec![record]).await?;
        single_outcome(collection, outcomes)
    }

    fn publish_stats(&self) {
        let now = self.clock.utc();
        let stats = self.snapshot.with_tasks(|tasks| BoardStats::compute(tasks, now));
        self.stats.send_replace(stats);
    }

    fn lock_ui(&self) -> parking_lot::MutexGuard<'_, UiState> {
        self.ui.lock()
    }
}

fn single_outcome(
    collection: Collection,
    outcomes: Vec<RecordOutcome>,
) -> RecordStoreResult<Record> {
    match outcomes.into_iter().next() {
        Some(RecordOutcome::Success(stored)) => Ok(stored),
        Some(RecordOutcome::Failure(message)) => {
            Err(RecordStoreError::rejected(collection, message))
        }
        None => Err(RecordStoreError::rejected(collection, "store returned no outcome")),
    }
}
