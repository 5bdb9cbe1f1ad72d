//! Domain model for the task board.
//!
//! Tasks, projects, and tags are plain values reconstructed from store
//! records; drafts carry not-yet-persisted form state, and statistics are
//! derived from a full task collection.

mod color;
mod draft;
mod error;
mod ids;
mod project;
mod stats;
mod tag;
mod task;

pub use color::{HexColor, PROJECT_PALETTE};
pub use draft::{ProjectDraft, TaskDraft};
pub use error::{
    BoardDomainError, FieldErrors, ParsePriorityError, ParseTaskStatusError, ValidationError,
};
pub use ids::{ProjectId, RecordId, TagId, TaskId};
pub use project::Project;
pub use stats::BoardStats;
pub use tag::Tag;
pub use task::{Priority, StoredStatus, Task, TaskData, TaskStatus};
