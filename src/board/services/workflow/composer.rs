//! Composer, detail view, and filter state.

use mockable::Clock;

use super::{TaskWorkflowController, WorkflowError, WorkflowResult};
use crate::board::{
    domain::{TagId, Task, TaskDraft, TaskId},
    ports::{Notifier, RecordStore},
    view::{PriorityFilter, StatusFilter, TaskFilter},
};

/// Task composer state: the form used to create or edit a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    open: bool,
    draft: TaskDraft,
    editing: Option<TaskId>,
}

impl Composer {
    /// Returns `true` while the composer is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Returns the draft being composed.
    #[must_use]
    pub const fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    /// Returns the task being edited, or `None` when composing a new task.
    #[must_use]
    pub const fn editing(&self) -> Option<&TaskId> {
        self.editing.as_ref()
    }
}

#[derive(Debug, Default)]
pub(super) struct UiState {
    composer: Composer,
    selected: Option<TaskId>,
    filter: TaskFilter,
}

impl UiState {
    pub(super) fn reset_composer(&mut self) {
        self.composer = Composer::default();
    }

    /// Attaches `tag` to the draft when the composer is open.
    pub(super) fn attach_to_open_draft(&mut self, tag: &TagId) {
        if self.composer.open {
            self.composer.draft.attach_tag(tag.clone());
        }
    }

    /// Drops every reference to a task that no longer exists.
    pub(super) fn forget_task(&mut self, id: &TaskId) {
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        if self.composer.editing.as_ref() == Some(id) {
            self.reset_composer();
        }
    }
}

impl<S, N, C> TaskWorkflowController<S, N, C>
where
    S: RecordStore,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Opens the composer with a blank draft.
    pub fn open_composer(&self) {
        let mut ui = self.lock_ui();
        ui.composer = Composer {
            open: true,
            ..Composer::default()
        };
    }

    /// Closes the composer and discards its draft.
    pub fn close_composer(&self) {
        self.lock_ui().reset_composer();
    }

    /// Opens the composer on a copy of task `id` for editing.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::TaskNotFound`] when the task is not loaded.
    pub fn edit_task(&self, id: &TaskId) -> WorkflowResult<()> {
        let task = self.require_task(id)?;
        self.lock_ui().composer = Composer {
            open: true,
            draft: TaskDraft::from_task(&task),
            editing: Some(id.clone()),
        };
        Ok(())
    }

    /// Returns a copy of the composer state.
    #[must_use]
    pub fn composer(&self) -> Composer {
        self.lock_ui().composer.clone()
    }

    /// Returns a copy of the draft being composed.
    #[must_use]
    pub fn draft(&self) -> TaskDraft {
        self.lock_ui().composer.draft.clone()
    }

    /// Applies `edit` to the draft being composed.
    ///
    /// `edit` runs on a copy without the UI lock held, so it may call back
    /// into the controller.
    pub fn update_draft(&self, edit: impl FnOnce(&mut TaskDraft)) {
        let mut draft = self.draft();
        edit(&mut draft);
        self.lock_ui().composer.draft = draft;
    }

    /// Adds `tag` to the draft when absent, removes it when present.
    pub fn toggle_draft_tag(&self, tag: TagId) {
        self.lock_ui().composer.draft.toggle_tag(tag);
    }

    /// Submits the composer draft, creating a task or updating the task
    /// being edited.
    ///
    /// # Errors
    ///
    /// As for [`Self::create_task`] and [`Self::update_task`].
    pub async fn submit_draft(&self) -> WorkflowResult<Task> {
        let Composer { draft, editing, .. } = self.composer();
        match editing {
            Some(id) => self.update_task(&id, &draft).await,
            None => self.create_task(&draft).await,
        }
    }

    /// Shows task `id` in the detail view.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::TaskNotFound`] when the task is not loaded.
    pub fn open_details(&self, id: &TaskId) -> WorkflowResult<()> {
        self.require_task(id)?;
        self.lock_ui().selected = Some(id.clone());
        Ok(())
    }

    /// Closes the detail view.
    pub fn close_details(&self) {
        self.lock_ui().selected = None;
    }

    /// Returns the task shown in the detail view.
    #[must_use]
    pub fn selected_task(&self) -> Option<Task> {
        let selected = self.lock_ui().selected.clone()?;
        self.snapshot.find(&selected)
    }

    /// Returns the active filter.
    #[must_use]
    pub fn filter(&self) -> TaskFilter {
        self.lock_ui().filter.clone()
    }

    /// Replaces the active filter.
    pub fn set_filter(&self, filter: TaskFilter) {
        self.lock_ui().filter = filter;
    }

    /// Sets the status predicate of the active filter.
    pub fn set_status_filter(&self, status: StatusFilter) {
        self.lock_ui().filter.status = status;
    }

    /// Sets the priority predicate of the active filter.
    pub fn set_priority_filter(&self, priority: PriorityFilter) {
        self.lock_ui().filter.priority = priority;
    }

    /// Sets the free-text query of the active filter.
    pub fn set_query(&self, query: impl Into<String>) {
        self.lock_ui().filter.query = query.into();
    }

    fn require_task(&self, id: &TaskId) -> WorkflowResult<Task> {
        self.snapshot
            .find(id)
            .ok_or_else(|| WorkflowError::TaskNotFound(id.clone()))
    }
}
