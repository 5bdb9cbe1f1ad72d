//! Pure derived views over a task collection.
//!
//! Nothing here touches the store: filters select a subset of tasks in
//! input order and the partitioner splits tasks into board columns.

mod filter;
mod partition;

pub use filter::{PriorityFilter, StatusFilter, TaskFilter, visible_tasks};
pub use partition::{Board, partition};
