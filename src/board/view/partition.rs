//! Board column partitioning.

use super::TaskFilter;
use crate::board::domain::{Task, TaskStatus};

/// Tasks split into the three status columns, each in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board<'a> {
    to_do: Vec<&'a Task>,
    in_progress: Vec<&'a Task>,
    done: Vec<&'a Task>,
    dropped: usize,
}

/// Splits `tasks` into board columns.
///
/// Tasks with an unrecognized status belong to no column; they are left
/// out, logged, and counted in [`Board::dropped`].
#[must_use]
pub fn partition<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Board<'a> {
    let mut board = Board::default();
    for task in tasks {
        match task.status() {
            Some(TaskStatus::ToDo) => board.to_do.push(task),
            Some(TaskStatus::InProgress) => board.in_progress.push(task),
            Some(TaskStatus::Done) => board.done.push(task),
            None => {
                tracing::warn!(
                    task_id = %task.id(),
                    status = %task.stored_status(),
                    "leaving task with unrecognized status off the board"
                );
                board.dropped += 1;
            }
        }
    }
    board
}

impl<'a> Board<'a> {
    /// Returns the tasks of one column.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[&'a Task] {
        match status {
            TaskStatus::ToDo => &self.to_do,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    /// Iterates over the columns in display order.
    pub fn columns(&self) -> impl Iterator<Item = (TaskStatus, &[&'a Task])> + '_ {
        TaskStatus::COLUMNS
            .into_iter()
            .map(|status| (status, self.column(status)))
    }

    /// Returns the tasks of one column that `filter` shows in place.
    ///
    /// See [`TaskFilter::matches_in_column`]: the status predicate is never
    /// applied, and a search query takes precedence over the priority.
    #[must_use]
    pub fn column_view(&self, status: TaskStatus, filter: &TaskFilter) -> Vec<&'a Task> {
        self.column(status)
            .iter()
            .copied()
            .filter(|task| filter.matches_in_column(task))
            .collect()
    }

    /// Returns the number of tasks placed in columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_do.len() + self.in_progress.len() + self.done.len()
    }

    /// Returns `true` when no task was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns how many tasks were left out for an unrecognized status.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }
}
