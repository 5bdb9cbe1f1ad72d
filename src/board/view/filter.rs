//! Compound task filter.

use crate::board::domain::{
    ParsePriorityError, ParseTaskStatusError, Priority, Task, TaskStatus,
};

const ALL: &str = "all";

/// Status predicate of a [`TaskFilter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Any status, unrecognized ones included.
    #[default]
    All,
    /// Only tasks with this status.
    Only(TaskStatus),
}

impl StatusFilter {
    /// Returns `true` when `task` passes the predicate.
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => task.status() == Some(status),
        }
    }
}

impl TryFrom<&str> for StatusFilter {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case(ALL) {
            return Ok(Self::All);
        }
        TaskStatus::try_from(value).map(Self::Only)
    }
}

/// Priority predicate of a [`TaskFilter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    /// Any priority.
    #[default]
    All,
    /// Only tasks with this priority.
    Only(Priority),
}

impl PriorityFilter {
    /// Returns `true` when `task` passes the predicate.
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(priority) => task.priority() == priority,
        }
    }
}

impl TryFrom<&str> for PriorityFilter {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case(ALL) {
            return Ok(Self::All);
        }
        Priority::try_from(value).map(Self::Only)
    }
}

/// Status, priority, and free-text predicates combined with logical AND.
///
/// The text query matches title or description case-insensitively; an
/// empty query matches everything. Tags and projects are never searched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Status predicate.
    pub status: StatusFilter,
    /// Priority predicate.
    pub priority: PriorityFilter,
    /// Free-text query.
    pub query: String,
}

impl TaskFilter {
    /// Creates a filter that lets every task through.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status predicate.
    #[must_use]
    pub const fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority predicate.
    #[must_use]
    pub const fn with_priority(mut self, priority: PriorityFilter) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the free-text query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Returns `true` when any predicate narrows the result.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status != StatusFilter::All
            || self.priority != PriorityFilter::All
            || !self.query.is_empty()
    }

    /// Returns `true` when `task` passes every predicate.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.matches(task) && self.priority.matches(task) && self.matches_query(task)
    }

    /// Returns `true` when `task` is shown inside its board column.
    ///
    /// The column already fixes the status, so the status predicate is not
    /// consulted. A non-empty query alone decides; the priority predicate
    /// applies only while the query is empty.
    #[must_use]
    pub fn matches_in_column(&self, task: &Task) -> bool {
        if self.query.is_empty() {
            self.priority.matches(task)
        } else {
            self.matches_query(task)
        }
    }

    fn matches_query(&self, task: &Task) -> bool {
        self.query.is_empty() || task.mentions(&self.query.to_lowercase())
    }
}

/// Returns the tasks passing `filter`, in input order.
#[must_use]
pub fn visible_tasks<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    filter: &TaskFilter,
) -> Vec<&'a Task> {
    tasks
        .into_iter()
        .filter(|task| filter.matches(task))
        .collect()
}
