//! Mapping between store records and board entities.
//!
//! Reading is lenient: missing fields take defaults and records without a
//! usable identifier are skipped. Writing produces records in the store
//! schema for create, update, and status-change calls.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;

use crate::board::{
    domain::{
        HexColor, Priority, Project, ProjectDraft, ProjectId, RecordId, StoredStatus, Tag, TagId,
        Task, TaskData, TaskDraft, TaskId, TaskStatus,
    },
    ports::{ID_FIELD, Record, record_id},
};

/// Store field names.
pub mod fields {
    /// Display name; doubles as the task title and the project/tag name.
    pub const NAME: &str = "Name";
    /// Task title.
    pub const TITLE: &str = "title";
    /// Free-form description.
    pub const DESCRIPTION: &str = "description";
    /// Task priority.
    pub const PRIORITY: &str = "priority";
    /// Task status.
    pub const STATUS: &str = "status";
    /// Task due date.
    pub const DUE_DATE: &str = "dueDate";
    /// Task completion timestamp.
    pub const COMPLETED_AT: &str = "completedAt";
    /// Owning project of a task.
    pub const PROJECT_ID: &str = "projectId";
    /// Comma-delimited tag identifiers of a task.
    pub const TAGS: &str = "Tags";
    /// Project or tag colour.
    pub const COLOR: &str = "color";
    /// Creation timestamp.
    pub const CREATED_ON: &str = "CreatedOn";
    /// Modification timestamp.
    pub const MODIFIED_ON: &str = "ModifiedOn";
}

/// Fields requested when listing tasks.
pub const TASK_FIELDS: [&str; 12] = [
    ID_FIELD,
    fields::NAME,
    fields::TITLE,
    fields::DESCRIPTION,
    fields::PRIORITY,
    fields::STATUS,
    fields::DUE_DATE,
    fields::COMPLETED_AT,
    fields::PROJECT_ID,
    fields::TAGS,
    fields::CREATED_ON,
    fields::MODIFIED_ON,
];

/// Fields requested when listing projects.
pub const PROJECT_FIELDS: [&str; 6] = [
    ID_FIELD,
    fields::NAME,
    fields::DESCRIPTION,
    fields::COLOR,
    fields::CREATED_ON,
    fields::MODIFIED_ON,
];

/// Fields requested when listing tags.
pub const TAG_FIELDS: [&str; 5] = [
    ID_FIELD,
    fields::NAME,
    fields::COLOR,
    fields::CREATED_ON,
    fields::MODIFIED_ON,
];

const TAG_DELIMITER: &str = ",";

/// Converts store records into entities.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    default_color: HexColor,
}

impl Normalizer {
    /// Creates a normalizer using `default_color` for records without a
    /// valid colour.
    #[must_use]
    pub const fn new(default_color: HexColor) -> Self {
        Self { default_color }
    }

    /// Normalizes every task record, skipping unusable ones.
    #[must_use]
    pub fn tasks(&self, records: impl IntoIterator<Item = Record>) -> Vec<Task> {
        records
            .into_iter()
            .filter_map(|record| self.task(&record))
            .collect()
    }

    /// Normalizes a task record.
    ///
    /// Returns `None` when the record has no usable identifier.
    #[must_use]
    pub fn task(&self, record: &Record) -> Option<Task> {
        let Some(id) = record_id(record).map(TaskId::from) else {
            tracing::warn!(collection = "tasks", "skipping record without identifier");
            return None;
        };

        let title = text(record, fields::TITLE)
            .or_else(|| text(record, fields::NAME))
            .unwrap_or_default();
        if title.trim().is_empty() {
            tracing::warn!(task_id = %id, "task record has an empty title");
        }

        let priority = match text(record, fields::PRIORITY) {
            None => Priority::default(),
            Some(raw) => Priority::try_from(raw.as_str()).unwrap_or_else(|err| {
                tracing::warn!(task_id = %id, error = %err, "treating unknown priority as medium");
                Priority::default()
            }),
        };

        let status = text(record, fields::STATUS)
            .map_or(StoredStatus::Canonical(TaskStatus::default()), |raw| {
                StoredStatus::from(raw.as_str())
            });

        let created_at = timestamp(record, fields::CREATED_ON);
        let updated_at = timestamp(record, fields::MODIFIED_ON);
        let completed_at = reconcile_completion(
            &id,
            &status,
            timestamp(record, fields::COMPLETED_AT),
            updated_at.or(created_at),
        );

        Some(Task::from_data(TaskData {
            due_date: due_date(&id, record),
            project_id: scalar(record, fields::PROJECT_ID)
                .and_then(|raw| ProjectId::new(raw).ok()),
            tags: parse_tags(text(record, fields::TAGS).as_deref()),
            description: text(record, fields::DESCRIPTION).unwrap_or_default(),
            id,
            title,
            priority,
            status,
            created_at,
            updated_at,
            completed_at,
        }))
    }

    /// Normalizes every project record, skipping unusable ones.
    #[must_use]
    pub fn projects(&self, records: impl IntoIterator<Item = Record>) -> Vec<Project> {
        records
            .into_iter()
            .filter_map(|record| self.project(&record))
            .collect()
    }

    /// Normalizes a project record.
    ///
    /// Returns `None` when the record has no usable identifier or name.
    #[must_use]
    pub fn project(&self, record: &Record) -> Option<Project> {
        let Some(id) = record_id(record).map(ProjectId::from) else {
            tracing::warn!(collection = "projects", "skipping record without identifier");
            return None;
        };
        let name = text(record, fields::NAME).unwrap_or_default();
        let description = text(record, fields::DESCRIPTION).unwrap_or_default();
        let color = self.color(record);
        match Project::new(id.clone(), name, description, color) {
            Ok(project) => Some(project.with_timestamps(
                timestamp(record, fields::CREATED_ON),
                timestamp(record, fields::MODIFIED_ON),
            )),
            Err(err) => {
                tracing::warn!(project_id = %id, error = %err, "skipping project record");
                None
            }
        }
    }

    /// Normalizes every tag record, skipping unusable ones.
    #[must_use]
    pub fn tags(&self, records: impl IntoIterator<Item = Record>) -> Vec<Tag> {
        records
            .into_iter()
            .filter_map(|record| self.tag(&record))
            .collect()
    }

    /// Normalizes a tag record.
    ///
    /// Returns `None` when the record has no usable identifier or name.
    #[must_use]
    pub fn tag(&self, record: &Record) -> Option<Tag> {
        let Some(id) = record_id(record).map(TagId::from) else {
            tracing::warn!(collection = "tags", "skipping record without identifier");
            return None;
        };
        let name = text(record, fields::NAME).unwrap_or_default();
        match Tag::new(id.clone(), name, self.color(record)) {
            Ok(tag) => Some(tag),
            Err(err) => {
                tracing::warn!(tag_id = %id, error = %err, "skipping tag record");
                None
            }
        }
    }

    fn color(&self, record: &Record) -> HexColor {
        text(record, fields::COLOR)
            .and_then(|raw| HexColor::new(raw).ok())
            .unwrap_or_else(|| self.default_color.clone())
    }
}

/// Builds the record for creating a task from `draft`.
#[must_use]
pub fn task_record(draft: &TaskDraft, now: DateTime<Utc>) -> Record {
    let mut record = Record::new();
    record.insert(fields::NAME.to_owned(), Value::from(draft.title.as_str()));
    record.insert(fields::TITLE.to_owned(), Value::from(draft.title.as_str()));
    record.insert(
        fields::DESCRIPTION.to_owned(),
        Value::from(draft.description.as_str()),
    );
    record.insert(fields::PRIORITY.to_owned(), Value::from(draft.priority.as_str()));
    record.insert(fields::STATUS.to_owned(), Value::from(draft.status.as_str()));
    record.insert(
        fields::DUE_DATE.to_owned(),
        Value::from(
            draft
                .due_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ),
    );
    record.insert(
        fields::COMPLETED_AT.to_owned(),
        completion_value(draft.status, now),
    );
    record.insert(
        fields::PROJECT_ID.to_owned(),
        Value::from(
            draft
                .project_id
                .as_ref()
                .map(ProjectId::as_str)
                .unwrap_or_default(),
        ),
    );
    record.insert(fields::TAGS.to_owned(), Value::from(join_tags(&draft.tags)));
    record
}

/// Builds the full-record update of task `id` from `draft`.
#[must_use]
pub fn task_update_record(id: &TaskId, draft: &TaskDraft, now: DateTime<Utc>) -> Record {
    let mut record = task_record(draft, now);
    record.insert(ID_FIELD.to_owned(), id_value(id.record_id()));
    record
}

/// Builds the partial update moving task `id` to `status`.
#[must_use]
pub fn status_record(id: &TaskId, status: TaskStatus, now: DateTime<Utc>) -> Record {
    let mut record = Record::new();
    record.insert(ID_FIELD.to_owned(), id_value(id.record_id()));
    record.insert(fields::STATUS.to_owned(), Value::from(status.as_str()));
    record.insert(fields::COMPLETED_AT.to_owned(), completion_value(status, now));
    record
}

/// Builds the record for creating a project.
#[must_use]
pub fn project_record(draft: &ProjectDraft) -> Record {
    let mut record = Record::new();
    record.insert(fields::NAME.to_owned(), Value::from(draft.name.trim()));
    record.insert(
        fields::DESCRIPTION.to_owned(),
        Value::from(draft.description.as_str()),
    );
    record.insert(fields::COLOR.to_owned(), Value::from(draft.color.as_str()));
    record
}

/// Builds the record for creating a tag.
#[must_use]
pub fn tag_record(name: &str, color: &HexColor) -> Record {
    let mut record = Record::new();
    record.insert(fields::NAME.to_owned(), Value::from(name));
    record.insert(fields::COLOR.to_owned(), Value::from(color.as_str()));
    record
}

/// Splits a comma-delimited tag list into an ordered set of identifiers.
#[must_use]
pub fn parse_tags(raw: Option<&str>) -> Vec<TagId> {
    let mut tags: Vec<TagId> = Vec::new();
    for tag in raw
        .unwrap_or_default()
        .split(TAG_DELIMITER)
        .filter_map(|part| TagId::new(part).ok())
    {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

fn join_tags(tags: &[TagId]) -> String {
    tags.iter()
        .map(TagId::as_str)
        .collect::<Vec<_>>()
        .join(TAG_DELIMITER)
}

/// Numeric identifiers go back to the store as numbers.
fn id_value(id: &RecordId) -> Value {
    id.as_str()
        .parse::<u64>()
        .map_or_else(|_| Value::from(id.as_str()), Value::from)
}

fn completion_value(status: TaskStatus, now: DateTime<Utc>) -> Value {
    if status == TaskStatus::Done {
        Value::from(now.to_rfc3339_opts(SecondsFormat::Micros, true))
    } else {
        Value::Null
    }
}

/// Non-empty string field.
fn text(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(raw) if !raw.trim().is_empty() => Some(raw.clone()),
        _ => None,
    }
}

/// Non-empty string or number field, rendered as a string.
fn scalar(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::Number(number) => Some(number.to_string()),
        Value::String(_) => text(record, field),
        _ => None,
    }
}

fn timestamp(record: &Record, field: &str) -> Option<DateTime<Utc>> {
    let raw = text(record, field)?;
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok()
}

fn due_date(id: &TaskId, record: &Record) -> Option<NaiveDate> {
    let raw = text(record, fields::DUE_DATE)?;
    let trimmed = raw.trim();
    let parsed = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|stamp| stamp.date_naive())
        });
    if parsed.is_none() {
        tracing::warn!(task_id = %id, due_date = trimmed, "ignoring unparseable due date");
    }
    parsed
}

/// Enforces "completed-at is present iff the task is done".
fn reconcile_completion(
    id: &TaskId,
    status: &StoredStatus,
    completed_at: Option<DateTime<Utc>>,
    fallback: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    let is_done = status.canonical() == Some(TaskStatus::Done);
    match (is_done, completed_at) {
        (true, Some(at)) => Some(at),
        (true, None) => {
            tracing::warn!(
                task_id = %id,
                "done task has no completion time; using last modification"
            );
            fallback
        }
        (false, Some(_)) => {
            tracing::warn!(
                task_id = %id,
                status = %status,
                "dropping completion time of unfinished task"
            );
            None
        }
        (false, None) => None,
    }
}
