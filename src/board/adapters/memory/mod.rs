//! In-memory adapters for tests and local runs.

mod notifier;
mod record_store;

pub use notifier::RecordingNotifier;
pub use record_store::{InMemoryRecordStore, StoreOperation};
