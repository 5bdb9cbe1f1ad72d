//! Task entity and its priority and status types.

use super::{ParsePriorityError, ParseTaskStatusError, ProjectId, TagId, TaskId};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Default priority.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical task status; each value is one board column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not started.
    #[default]
    #[serde(rename = "to-do")]
    ToDo,
    /// Being worked on.
    #[serde(rename = "in-progress")]
    InProgress,
    /// Finished.
    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    /// Board columns in display order.
    pub const COLUMNS: [Self; 3] = [Self::ToDo, Self::InProgress, Self::Done];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "to-do",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    /// Returns the human-readable label, e.g. `in progress`.
    #[must_use]
    pub fn label(self) -> String {
        self.as_str().replace('-', " ")
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "to-do" => Ok(Self::ToDo),
            "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status as stored, which may fall outside the canonical set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredStatus {
    /// One of the three board columns.
    Canonical(TaskStatus),
    /// Any other stored value, kept verbatim.
    Unrecognized(String),
}

impl StoredStatus {
    /// Returns the canonical status, if any.
    #[must_use]
    pub const fn canonical(&self) -> Option<TaskStatus> {
        match self {
            Self::Canonical(status) => Some(*status),
            Self::Unrecognized(_) => None,
        }
    }

    /// Returns the stored representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Canonical(status) => status.as_str(),
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<TaskStatus> for StoredStatus {
    fn from(status: TaskStatus) -> Self {
        Self::Canonical(status)
    }
}

impl From<&str> for StoredStatus {
    fn from(value: &str) -> Self {
        TaskStatus::try_from(value).map_or_else(
            |_| Self::Unrecognized(value.to_owned()),
            Self::Canonical,
        )
    }
}

impl fmt::Display for StoredStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter object for reconstructing a stored task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskData {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Task priority.
    pub priority: Priority,
    /// Stored status.
    pub status: StoredStatus,
    /// Calendar due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Owning project, if any.
    pub project_id: Option<ProjectId>,
    /// Attached tag identifiers.
    pub tags: Vec<TagId>,
    /// Store creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Store modification timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

/// A task on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    priority: Priority,
    status: StoredStatus,
    due_date: Option<NaiveDate>,
    project_id: Option<ProjectId>,
    tags: Vec<TagId>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Reconstructs a task from stored data.
    ///
    /// Duplicate tag identifiers are dropped, keeping first occurrences.
    #[must_use]
    pub fn from_data(data: TaskData) -> Self {
        let mut tags: Vec<TagId> = Vec::with_capacity(data.tags.len());
        for tag in data.tags {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            status: data.status,
            due_date: data.due_date,
            project_id: data.project_id,
            tags,
            created_at: data.created_at,
            updated_at: data.updated_at,
            completed_at: data.completed_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the canonical status, or `None` for an unrecognized one.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status.canonical()
    }

    /// Returns the status exactly as stored.
    #[must_use]
    pub const fn stored_status(&self) -> &StoredStatus {
        &self.status
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> Option<&ProjectId> {
        self.project_id.as_ref()
    }

    /// Returns the attached tag identifiers.
    #[must_use]
    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    /// Returns the store creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the store modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Returns the completion timestamp; present iff the task is done.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns `true` when the task is done.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status() == Some(TaskStatus::Done)
    }

    /// Returns `true` when the due date has passed and the task is not done.
    ///
    /// A due date counts from midnight UTC of that day.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date
            .is_some_and(|due| due.and_time(NaiveTime::MIN).and_utc() < now)
            && !self.is_done()
    }

    /// Returns `true` when the title or description contains `needle`.
    ///
    /// `needle` must already be lower-case.
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}
