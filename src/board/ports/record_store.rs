//! Record store port for durable board data.
//!
//! The store works on untyped JSON records grouped into collections. Field
//! names belong to the store schema; translating them into entities is the
//! normalizer's job.

use crate::board::domain::RecordId;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A stored record: a JSON object keyed by store field names.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Result type for record store operations.
pub type RecordStoreResult<T> = Result<T, RecordStoreError>;

/// Field carrying the store-assigned identifier of every record.
pub const ID_FIELD: &str = "Id";

/// Reads the identifier of `record`.
///
/// Strings and unsigned integers are accepted; anything else, including an
/// empty string, yields `None`.
#[must_use]
pub fn record_id(record: &Record) -> Option<RecordId> {
    match record.get(ID_FIELD)? {
        serde_json::Value::String(raw) => RecordId::new(raw.as_str()).ok(),
        serde_json::Value::Number(number) => number.as_u64().map(RecordId::from),
        _ => None,
    }
}

/// Logical collections used by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Task records.
    Tasks,
    /// Project records.
    Projects,
    /// Tag records.
    Tags,
}

impl Collection {
    /// Returns the collection name used in logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Projects => "projects",
            Self::Tags => "tags",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction of a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SortDirection {
    /// Smallest first.
    #[serde(rename = "ASC", alias = "asc")]
    Ascending,
    /// Largest first.
    #[serde(rename = "DESC", alias = "desc")]
    Descending,
}

/// Single sort key of a list query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SortKey {
    /// Store field to sort by.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortKey {
    /// Sorts by `field`, smallest first.
    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Sorts by `field`, largest first.
    #[must_use]
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Field selection and ordering for [`RecordStore::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    fields: Vec<String>,
    order_by: Option<SortKey>,
}

impl ListQuery {
    /// Creates a query returning every field in store order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the returned fields. An empty selection returns all fields.
    #[must_use]
    pub fn with_fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the sort key.
    #[must_use]
    pub fn ordered_by(mut self, key: SortKey) -> Self {
        self.order_by = Some(key);
        self
    }

    /// Returns the selected fields.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns the sort key.
    #[must_use]
    pub const fn order_by(&self) -> Option<&SortKey> {
        self.order_by.as_ref()
    }
}

/// Per-record result of a create or update call.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// The record was written; carries the stored record including
    /// server-assigned fields.
    Success(Record),
    /// The store rejected the record.
    Failure(String),
}

/// Record persistence contract.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Lists records of a collection.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError`] when the store cannot be queried.
    async fn list(
        &self,
        collection: Collection,
        query: &ListQuery,
    ) -> RecordStoreResult<Vec<Record>>;

    /// Creates records, returning one outcome per input record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError`] when the call as a whole fails.
    async fn create(
        &self,
        collection: Collection,
        records: Vec<Record>,
    ) -> RecordStoreResult<Vec<RecordOutcome>>;

    /// Updates records keyed by their `Id` field; only fields present in a
    /// record are changed.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError`] when the call as a whole fails.
    async fn update(
        &self,
        collection: Collection,
        records: Vec<Record>,
    ) -> RecordStoreResult<Vec<RecordOutcome>>;

    /// Deletes records by identifier.
    ///
    /// Returns `false` when the store did not acknowledge the deletion.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError`] when the call as a whole fails.
    async fn delete(&self, collection: Collection, ids: &[RecordId]) -> RecordStoreResult<bool>;
}

/// Errors returned by record store implementations and their callers.
#[derive(Debug, Clone, Error)]
pub enum RecordStoreError {
    /// The store could not be reached.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// The store refused an operation on a collection.
    #[error("{collection} operation rejected: {message}")]
    Rejected {
        /// Collection the operation targeted.
        collection: Collection,
        /// Store-provided reason.
        message: String,
    },

    /// Backend failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RecordStoreError {
    /// Wraps a backend error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Builds a rejection for `collection`.
    #[must_use]
    pub fn rejected(collection: Collection, message: impl Into<String>) -> Self {
        Self::Rejected {
            collection,
            message: message.into(),
        }
    }
}
