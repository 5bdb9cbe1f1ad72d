//! Per-operation progress tracking.
//!
//! Each workflow operation runs under a key made of its kind and target
//! entity. A key that is already in flight cannot be started again; keys
//! that differ run independently.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;

use crate::board::domain::RecordId;

/// Kinds of workflow operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Creating a task.
    CreateTask,
    /// Updating a task from a draft.
    UpdateTask,
    /// Deleting a task.
    DeleteTask,
    /// Moving a task to another status.
    ChangeStatus,
    /// Creating a tag.
    CreateTag,
    /// Creating a project.
    CreateProject,
}

impl OperationKind {
    /// Returns the operation name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateTask => "create_task",
            Self::UpdateTask => "update_task",
            Self::DeleteTask => "delete_task",
            Self::ChangeStatus => "change_status",
            Self::CreateTag => "create_tag",
            Self::CreateProject => "create_project",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation kind plus the entity it targets, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationKey {
    /// Operation kind.
    pub kind: OperationKind,
    /// Targeted record; `None` for creations.
    pub target: Option<RecordId>,
}

impl OperationKey {
    /// Key for an operation without a target entity.
    #[must_use]
    pub const fn untargeted(kind: OperationKind) -> Self {
        Self { kind, target: None }
    }

    /// Key for an operation on `target`.
    #[must_use]
    pub fn targeted(kind: OperationKind, target: impl Into<RecordId>) -> Self {
        Self {
            kind,
            target: Some(target.into()),
        }
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{} {target}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Progress of one operation key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OperationState {
    /// Not running.
    #[default]
    Idle,
    /// Waiting for the record store.
    InFlight,
    /// The last attempt failed with the given message.
    Failed(String),
}

/// Busy flags for the presentation layer's controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyFlags {
    /// A task create or update is in flight.
    pub submitting: bool,
    /// A task delete is in flight.
    pub deleting: bool,
    /// A status change is in flight.
    pub updating_status: bool,
}

/// Tracks the state of every operation key.
#[derive(Debug, Default)]
pub struct OperationTracker {
    states: Mutex<HashMap<OperationKey, OperationState>>,
}

impl OperationTracker {
    /// Creates a tracker with every key idle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` in flight.
    ///
    /// Returns `None` when `key` is already in flight.
    #[must_use]
    pub fn begin(&self, key: OperationKey) -> Option<OperationGuard<'_>> {
        let mut states = self.states.lock();
        if states.get(&key) == Some(&OperationState::InFlight) {
            return None;
        }
        states.insert(key.clone(), OperationState::InFlight);
        Some(OperationGuard {
            tracker: self,
            key: Some(key),
        })
    }

    /// Returns the state of `key`.
    #[must_use]
    pub fn state(&self, key: &OperationKey) -> OperationState {
        self.states.lock().get(key).cloned().unwrap_or_default()
    }

    /// Returns `true` when any key of `kind` is in flight.
    #[must_use]
    pub fn any_in_flight(&self, kind: OperationKind) -> bool {
        self.states
            .lock()
            .iter()
            .any(|(key, state)| key.kind == kind && *state == OperationState::InFlight)
    }

    /// Summarizes the in-flight task operations.
    #[must_use]
    pub fn busy_flags(&self) -> BusyFlags {
        BusyFlags {
            submitting: self.any_in_flight(OperationKind::CreateTask)
                || self.any_in_flight(OperationKind::UpdateTask),
            deleting: self.any_in_flight(OperationKind::DeleteTask),
            updating_status: self.any_in_flight(OperationKind::ChangeStatus),
        }
    }

    fn settle(&self, key: OperationKey, outcome: OperationState) {
        let mut states = self.states.lock();
        if outcome == OperationState::Idle {
            states.remove(&key);
        } else {
            states.insert(key, outcome);
        }
    }
}

/// In-flight marker for one operation key.
///
/// Dropping the guard without settling it, for example when the operation
/// future is cancelled, returns the key to idle.
#[derive(Debug)]
pub struct OperationGuard<'a> {
    tracker: &'a OperationTracker,
    key: Option<OperationKey>,
}

impl OperationGuard<'_> {
    /// Marks the operation finished successfully.
    pub fn succeed(mut self) {
        if let Some(key) = self.key.take() {
            self.tracker.settle(key, OperationState::Idle);
        }
    }

    /// Marks the operation failed.
    pub fn fail(mut self, message: impl Into<String>) {
        if let Some(key) = self.key.take() {
            self.tracker.settle(key, OperationState::Failed(message.into()));
        }
    }
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.tracker.settle(key, OperationState::Idle);
        }
    }
}
