//! Port contracts for the task board.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod notifier;
pub mod record_store;

pub use notifier::{Notification, NotificationLevel, Notifier};
pub use record_store::{
    Collection, ID_FIELD, ListQuery, Record, RecordOutcome, RecordStore, RecordStoreError,
    RecordStoreResult, SortDirection, SortKey, record_id,
};
