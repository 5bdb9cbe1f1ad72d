//! Versioned task snapshot.
//!
//! Every reload takes a ticket before it queries the store. A finished
//! reload installs its tasks only when its ticket is newer than the one
//! already installed, so a slow reload can never overwrite a fresher one.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::board::domain::{Task, TaskId};

/// Ticket identifying one reload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReloadTicket(u64);

impl ReloadTicket {
    /// Returns the ticket number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct Installed {
    version: u64,
    tasks: Vec<Task>,
}

/// Task collection replaced wholesale by the newest completed reload.
#[derive(Debug, Default)]
pub struct TaskSnapshot {
    issued: AtomicU64,
    installed: RwLock<Installed>,
}

impl TaskSnapshot {
    /// Creates an empty snapshot at version zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next reload ticket.
    #[must_use]
    pub fn issue_ticket(&self) -> ReloadTicket {
        ReloadTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Replaces the tasks if `ticket` is newer than the installed version.
    ///
    /// Returns `false` and keeps the current tasks for a stale ticket.
    #[must_use]
    pub fn install(&self, ticket: ReloadTicket, tasks: Vec<Task>) -> bool {
        let mut installed = self.installed.write();
        if ticket.0 <= installed.version {
            return false;
        }
        installed.version = ticket.0;
        installed.tasks = tasks;
        true
    }

    /// Returns the installed version; zero before the first install.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.installed.read().version
    }

    /// Returns a copy of the installed tasks.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.installed.read().tasks.clone()
    }

    /// Returns a copy of the task with `id`.
    #[must_use]
    pub fn find(&self, id: &TaskId) -> Option<Task> {
        self.installed
            .read()
            .tasks
            .iter()
            .find(|task| task.id() == id)
            .cloned()
    }

    /// Runs `f` over the installed tasks without copying them.
    #[must_use]
    pub fn with_tasks<R>(&self, f: impl FnOnce(&[Task]) -> R) -> R {
        f(&self.installed.read().tasks)
    }
}
