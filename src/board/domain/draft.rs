//! Form state for entities that have not been persisted yet.

use super::{
    FieldErrors, HexColor, Priority, ProjectId, TagId, Task, TaskStatus, ValidationError,
};
use chrono::NaiveDate;

/// Task form state used for create, update, and the composer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Task title; must not be blank on submission.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Task priority.
    pub priority: Priority,
    /// Target status.
    pub status: TaskStatus,
    /// Calendar due date.
    pub due_date: Option<NaiveDate>,
    /// Owning project.
    pub project_id: Option<ProjectId>,
    /// Attached tag identifiers.
    pub tags: Vec<TagId>,
}

impl TaskDraft {
    /// Creates a draft with the given title and default fields.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Loads an existing task into a draft for editing.
    ///
    /// A task with an unrecognized status is edited as `to-do`.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title().to_owned(),
            description: task.description().to_owned(),
            priority: task.priority(),
            status: task.status().unwrap_or_default(),
            due_date: task.due_date(),
            project_id: task.project_id().cloned(),
            tags: task.tags().to_vec(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the owning project.
    #[must_use]
    pub fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Sets the attached tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Adds `tag` when absent, removes it when present.
    pub fn toggle_tag(&mut self, tag: TagId) {
        if let Some(position) = self.tags.iter().position(|existing| *existing == tag) {
            self.tags.remove(position);
        } else {
            self.tags.push(tag);
        }
    }

    /// Adds `tag` unless already attached.
    pub fn attach_tag(&mut self, tag: TagId) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Checks the draft can be submitted.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] when the title is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// Project form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    /// Project name; must not be blank on submission.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Display colour.
    pub color: HexColor,
}

impl ProjectDraft {
    /// Creates a draft with the given name and default colour.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the colour.
    #[must_use]
    pub fn with_color(mut self, color: HexColor) -> Self {
        self.color = color;
        self
    }

    /// Checks every field and collects the failures.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidProject`] carrying one message per
    /// invalid field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", "Project name is required");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::InvalidProject(errors))
        }
    }
}
