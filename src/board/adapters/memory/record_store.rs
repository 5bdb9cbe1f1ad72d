//! In-memory record store for board tests.
//!
//! Besides plain storage the store can inject failures per operation and
//! hold the next call of an operation until released, which lets tests
//! observe in-flight workflow state.

use async_trait::async_trait;
use chrono::SecondsFormat;
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Semaphore;

use crate::board::{
    domain::RecordId,
    ports::{
        Collection, ID_FIELD, ListQuery, Record, RecordOutcome, RecordStore, RecordStoreError,
        RecordStoreResult, SortDirection, record_id,
    },
};

const CREATED_FIELD: &str = "CreatedOn";
const MODIFIED_FIELD: &str = "ModifiedOn";

/// Record store operation kinds, used for failure injection and call
/// counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// [`RecordStore::list`].
    List,
    /// [`RecordStore::create`].
    Create,
    /// [`RecordStore::update`].
    Update,
    /// [`RecordStore::delete`].
    Delete,
}

/// Thread-safe in-memory record store.
///
/// Identifiers are assigned from an increasing counter and stored as JSON
/// numbers; `CreatedOn` and `ModifiedOn` are maintained from the clock.
///
/// Clones share the same records and clock.
#[derive(Debug)]
pub struct InMemoryRecordStore<C = DefaultClock> {
    state: Arc<RwLock<InMemoryStoreState>>,
    clock: Arc<C>,
}

impl<C> Clone for InMemoryRecordStore<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    collections: HashMap<Collection, Vec<Record>>,
    last_id: u64,
    failures: HashMap<StoreOperation, String>,
    calls: HashMap<StoreOperation, usize>,
    pending_holds: HashMap<StoreOperation, Arc<Semaphore>>,
    active_holds: HashMap<StoreOperation, Arc<Semaphore>>,
}

impl InMemoryRecordStore<DefaultClock> {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(DefaultClock)
    }
}

impl Default for InMemoryRecordStore<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock + Send + Sync> InMemoryRecordStore<C> {
    /// Creates an empty store using `clock` for record timestamps.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryStoreState::default())),
            clock: Arc::new(clock),
        }
    }

    /// Inserts raw records as-is, bypassing identifier assignment.
    ///
    /// Numeric identifiers advance the counter so later creates do not
    /// collide with them.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::Persistence`] if the state lock is
    /// poisoned.
    pub fn seed(
        &self,
        collection: Collection,
        records: impl IntoIterator<Item = Record>,
    ) -> RecordStoreResult<()> {
        let mut state = self.write_state()?;
        for record in records {
            if let Some(numeric) = record.get(ID_FIELD).and_then(Value::as_u64) {
                state.last_id = state.last_id.max(numeric);
            }
            state
                .collections
                .entry(collection)
                .or_default()
                .push(record);
        }
        Ok(())
    }

    /// Makes every later call of `operation` fail with `message`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::Persistence`] if the state lock is
    /// poisoned.
    pub fn fail_operation(
        &self,
        operation: StoreOperation,
        message: impl Into<String>,
    ) -> RecordStoreResult<()> {
        self.write_state()?.failures.insert(operation, message.into());
        Ok(())
    }

    /// Clears a failure installed by [`Self::fail_operation`].
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::Persistence`] if the state lock is
    /// poisoned.
    pub fn recover_operation(&self, operation: StoreOperation) -> RecordStoreResult<()> {
        self.write_state()?.failures.remove(&operation);
        Ok(())
    }

    /// Holds the next call of `operation` after it has read or written the
    /// data, until [`Self::release`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::Persistence`] if the state lock is
    /// poisoned.
    pub fn hold_next(&self, operation: StoreOperation) -> RecordStoreResult<()> {
        self.write_state()?
            .pending_holds
            .insert(operation, Arc::new(Semaphore::new(0)));
        Ok(())
    }

    /// Releases a call held by [`Self::hold_next`].
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::Persistence`] if the state lock is
    /// poisoned.
    pub fn release(&self, operation: StoreOperation) -> RecordStoreResult<()> {
        let mut guard = self.write_state()?;
        let state = &mut *guard;
        for holds in [&mut state.pending_holds, &mut state.active_holds] {
            if let Some(gate) = holds.remove(&operation) {
                gate.close();
            }
        }
        Ok(())
    }

    /// Returns `true` while a call of `operation` is waiting on a hold.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::Persistence`] if the state lock is
    /// poisoned.
    pub fn is_held(&self, operation: StoreOperation) -> RecordStoreResult<bool> {
        Ok(self.read_state()?.active_holds.contains_key(&operation))
    }

    /// Returns how many times `operation` has been called, failed calls
    /// included.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::Persistence`] if the state lock is
    /// poisoned.
    pub fn call_count(&self, operation: StoreOperation) -> RecordStoreResult<usize> {
        Ok(self
            .read_state()?
            .calls
            .get(&operation)
            .copied()
            .unwrap_or_default())
    }

    /// Returns a stored record by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::Persistence`] if the state lock is
    /// poisoned.
    pub fn get(&self, collection: Collection, id: &RecordId) -> RecordStoreResult<Option<Record>> {
        let state = self.read_state()?;
        Ok(state
            .collections
            .get(&collection)
            .and_then(|records| find_record(records, id))
            .cloned())
    }

    fn timestamp(&self) -> Value {
        Value::String(
            self.clock
                .utc()
                .to_rfc3339_opts(SecondsFormat::Micros, true),
        )
    }

    fn read_state(&self) -> RecordStoreResult<RwLockReadGuard<'_, InMemoryStoreState>> {
        self.state
            .read()
            .map_err(|err| RecordStoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write_state(&self) -> RecordStoreResult<RwLockWriteGuard<'_, InMemoryStoreState>> {
        self.state
            .write()
            .map_err(|err| RecordStoreError::persistence(std::io::Error::other(err.to_string())))
    }

    /// Counts the call, applies injected failures, and claims a pending hold.
    fn begin_call(&self, operation: StoreOperation) -> RecordStoreResult<Option<Arc<Semaphore>>> {
        let mut state = self.write_state()?;
        *state.calls.entry(operation).or_default() += 1;
        if let Some(message) = state.failures.get(&operation) {
            return Err(RecordStoreError::Unavailable(message.clone()));
        }
        let hold = state.pending_holds.remove(&operation);
        if let Some(gate) = &hold {
            state.active_holds.insert(operation, Arc::clone(gate));
        }
        Ok(hold)
    }
}

/// Waits until a claimed hold is released.
async fn wait_for_release(hold: Option<Arc<Semaphore>>) {
    if let Some(gate) = hold {
        // A closed gate fails the acquire, which is the release signal.
        if let Ok(permit) = gate.acquire().await {
            permit.forget();
        }
    }
}

fn find_record<'a>(records: &'a [Record], id: &RecordId) -> Option<&'a Record> {
    records
        .iter()
        .find(|record| record_id(record).as_ref() == Some(id))
}

fn is_missing(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Orders JSON field values; absent and null values sort first.
fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            }
        }
        (Some(Value::String(a)), Some(Value::String(b))) => {
            a.to_lowercase().cmp(&b.to_lowercase())
        }
        (a, b) if is_missing(a) && is_missing(b) => Ordering::Equal,
        (a, _) if is_missing(a) => Ordering::Less,
        (_, b) if is_missing(b) => Ordering::Greater,
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
        _ => Ordering::Equal,
    }
}

fn select_fields(record: &Record, fields: &[String]) -> Record {
    if fields.is_empty() {
        return record.clone();
    }
    record
        .iter()
        .filter(|(key, _)| fields.iter().any(|field| field == *key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[async_trait]
impl<C: Clock + Send + Sync> RecordStore for InMemoryRecordStore<C> {
    async fn list(
        &self,
        collection: Collection,
        query: &ListQuery,
    ) -> RecordStoreResult<Vec<Record>> {
        let hold = self.begin_call(StoreOperation::List)?;
        let mut records = self
            .read_state()?
            .collections
            .get(&collection)
            .cloned()
            .unwrap_or_default();

        if let Some(key) = query.order_by() {
            records.sort_by(|a, b| {
                let ordering = compare_values(a.get(&key.field), b.get(&key.field));
                match key.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let selected = records
            .iter()
            .map(|record| select_fields(record, query.fields()))
            .collect();
        wait_for_release(hold).await;
        Ok(selected)
    }

    async fn create(
        &self,
        collection: Collection,
        records: Vec<Record>,
    ) -> RecordStoreResult<Vec<RecordOutcome>> {
        let hold = self.begin_call(StoreOperation::Create)?;
        let outcomes = {
            let mut state = self.write_state()?;
            let mut outcomes = Vec::with_capacity(records.len());
            for mut record in records {
                state.last_id += 1;
                let timestamp = self.timestamp();
                record.insert(ID_FIELD.to_owned(), Value::from(state.last_id));
                record.insert(CREATED_FIELD.to_owned(), timestamp.clone());
                record.insert(MODIFIED_FIELD.to_owned(), timestamp);
                state
                    .collections
                    .entry(collection)
                    .or_default()
                    .push(record.clone());
                outcomes.push(RecordOutcome::Success(record));
            }
            outcomes
        };
        wait_for_release(hold).await;
        Ok(outcomes)
    }

    async fn update(
        &self,
        collection: Collection,
        records: Vec<Record>,
    ) -> RecordStoreResult<Vec<RecordOutcome>> {
        let hold = self.begin_call(StoreOperation::Update)?;
        let outcomes = {
            let mut state = self.write_state()?;
            let timestamp = self.timestamp();
            let stored = state.collections.entry(collection).or_default();
            records
                .into_iter()
                .map(|changes| {
                    let Some(id) = record_id(&changes) else {
                        return RecordOutcome::Failure("record has no identifier".to_owned());
                    };
                    let Some(target) = stored
                        .iter_mut()
                        .find(|record| record_id(record).as_ref() == Some(&id))
                    else {
                        return RecordOutcome::Failure(format!("record {id} not found"));
                    };
                    for (field, value) in changes {
                        if field != ID_FIELD {
                            target.insert(field, value);
                        }
                    }
                    target.insert(MODIFIED_FIELD.to_owned(), timestamp.clone());
                    RecordOutcome::Success(target.clone())
                })
                .collect()
        };
        wait_for_release(hold).await;
        Ok(outcomes)
    }

    async fn delete(&self, collection: Collection, ids: &[RecordId]) -> RecordStoreResult<bool> {
        let hold = self.begin_call(StoreOperation::Delete)?;
        let all_found = {
            let mut state = self.write_state()?;
            let stored = state.collections.entry(collection).or_default();
            let before = stored.len();
            stored.retain(|record| record_id(record).is_none_or(|id| !ids.contains(&id)));
            before - stored.len() == ids.len()
        };
        wait_for_release(hold).await;
        Ok(all_found)
    }
}
