//! Aggregate counts over the full task collection.

use super::{Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Board-wide task counts, computed from the unfiltered collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    /// Number of tasks.
    pub total: usize,
    /// Tasks with status `done`.
    pub completed: usize,
    /// Tasks with status `to-do`.
    pub pending: usize,
    /// Tasks past their due date and not done.
    pub overdue: usize,
}

impl BoardStats {
    /// Computes statistics for `tasks` as of `now`.
    #[must_use]
    pub fn compute<'a>(tasks: impl IntoIterator<Item = &'a Task>, now: DateTime<Utc>) -> Self {
        tasks.into_iter().fold(Self::default(), |mut stats, task| {
            stats.total += 1;
            match task.status() {
                Some(TaskStatus::Done) => stats.completed += 1,
                Some(TaskStatus::ToDo) => stats.pending += 1,
                Some(TaskStatus::InProgress) | None => {}
            }
            if task.is_overdue(now) {
                stats.overdue += 1;
            }
            stats
        })
    }
}
