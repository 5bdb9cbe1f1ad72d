//! Tests for record normalization and encoding.

use crate::board::{
    domain::{
        HexColor, Priority, ProjectDraft, ProjectId, StoredStatus, TagId, TaskDraft, TaskId,
        TaskStatus,
    },
    ports::Record,
    services::{
        Normalizer,
        normalizer::{self as encode, fields},
    },
};
use chrono::{DateTime, NaiveDate, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn normalizer() -> Normalizer {
    Normalizer::new(HexColor::new("#10b981").expect("valid colour"))
}

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("test records must be JSON objects, got {other}"),
    }
}

fn tag_ids(raw: &[&str]) -> Vec<TagId> {
    raw.iter()
        .map(|id| TagId::new(*id).expect("valid tag id"))
        .collect()
}

#[rstest]
fn sparse_task_record_takes_defaults(normalizer: Normalizer) {
    let task = normalizer
        .task(&record(json!({ "Id": 12, "Name": "Write spec" })))
        .expect("record with id should normalize");

    assert_eq!(task.id().as_str(), "12");
    assert_eq!(task.title(), "Write spec");
    assert_eq!(task.description(), "");
    assert_eq!(task.priority(), Priority::Medium);
    assert_eq!(task.status(), Some(TaskStatus::ToDo));
    assert_eq!(task.due_date(), None);
    assert_eq!(task.project_id(), None);
    assert!(task.tags().is_empty());
    assert_eq!(task.completed_at(), None);
}

#[rstest]
fn title_field_wins_over_display_name(normalizer: Normalizer) {
    let task = normalizer
        .task(&record(json!({ "Id": "a1", "Name": "Display", "title": "Semantic" })))
        .expect("record should normalize");
    assert_eq!(task.title(), "Semantic");
}

#[rstest]
fn full_task_record_is_mapped(normalizer: Normalizer) {
    let task = normalizer
        .task(&record(json!({
            "Id": 3,
            "title": "Ship release",
            "description": "Tag and publish",
            "priority": "high",
            "status": "done",
            "dueDate": "2024-05-01",
            "completedAt": "2024-05-02T10:00:00Z",
            "projectId": 9,
            "Tags": " 4, 5,,4 ,6",
            "CreatedOn": "2024-04-01T08:00:00Z",
            "ModifiedOn": "2024-05-02T10:00:00Z",
        })))
        .expect("record should normalize");

    assert_eq!(task.priority(), Priority::High);
    assert_eq!(task.status(), Some(TaskStatus::Done));
    assert_eq!(task.due_date(), NaiveDate::from_ymd_opt(2024, 5, 1));
    assert_eq!(task.project_id(), Some(&ProjectId::new("9").expect("valid id")));
    assert_eq!(task.tags(), tag_ids(&["4", "5", "6"]).as_slice());
    assert_eq!(
        task.completed_at(),
        Some(
            DateTime::parse_from_rfc3339("2024-05-02T10:00:00Z")
                .expect("valid timestamp")
                .with_timezone(&Utc)
        )
    );
    assert!(task.created_at().is_some());
}

#[rstest]
fn unknown_priority_falls_back_to_medium(normalizer: Normalizer) {
    let task = normalizer
        .task(&record(json!({ "Id": 1, "title": "t", "priority": "urgent" })))
        .expect("record should normalize");
    assert_eq!(task.priority(), Priority::Medium);
}

#[rstest]
fn unknown_status_is_retained(normalizer: Normalizer) {
    let task = normalizer
        .task(&record(json!({ "Id": 1, "title": "t", "status": "blocked" })))
        .expect("record should normalize");
    assert_eq!(
        task.stored_status(),
        &StoredStatus::Unrecognized("blocked".to_owned())
    );
}

#[rstest]
#[case(json!("2024-05-01T23:30:00+02:00"), NaiveDate::from_ymd_opt(2024, 5, 1))]
#[case(json!("not a date"), None)]
#[case(json!(""), None)]
#[case(Value::Null, None)]
fn due_date_parsing(
    normalizer: Normalizer,
    #[case] raw: Value,
    #[case] expected: Option<NaiveDate>,
) {
    let task = normalizer
        .task(&record(json!({ "Id": 1, "title": "t", "dueDate": raw })))
        .expect("record should normalize");
    assert_eq!(task.due_date(), expected);
}

#[rstest]
#[case(json!({ "Name": "no id" }))]
#[case(json!({ "Id": null, "Name": "null id" }))]
#[case(json!({ "Id": "  ", "Name": "blank id" }))]
#[case(json!({ "Id": ["x"], "Name": "array id" }))]
fn records_without_usable_id_are_skipped(normalizer: Normalizer, #[case] raw: Value) {
    assert!(normalizer.task(&record(raw)).is_none());
}

#[rstest]
fn malformed_records_do_not_break_the_batch(normalizer: Normalizer) {
    let tasks = normalizer.tasks(vec![
        record(json!({ "Id": 1, "title": "first" })),
        record(json!({ "title": "orphan" })),
        record(json!({ "Id": 2, "title": "second" })),
    ]);

    let ids: Vec<&str> = tasks.iter().map(|task| task.id().as_str()).collect();
    assert_eq!(ids, ["1", "2"]);
}

#[rstest]
fn done_task_without_completion_uses_last_modification(normalizer: Normalizer) {
    let task = normalizer
        .task(&record(json!({
            "Id": 1,
            "title": "t",
            "status": "done",
            "CreatedOn": "2024-01-01T00:00:00Z",
            "ModifiedOn": "2024-01-03T00:00:00Z",
        })))
        .expect("record should normalize");
    assert_eq!(task.completed_at(), task.updated_at());
    assert!(task.completed_at().is_some());
}

#[rstest]
fn unfinished_task_drops_completion(normalizer: Normalizer) {
    let task = normalizer
        .task(&record(json!({
            "Id": 1,
            "title": "t",
            "status": "in-progress",
            "completedAt": "2024-01-03T00:00:00Z",
        })))
        .expect("record should normalize");
    assert_eq!(task.completed_at(), None);
}

#[rstest]
fn project_and_tag_colours_fall_back_to_default(normalizer: Normalizer) {
    let project = normalizer
        .project(&record(json!({ "Id": 1, "Name": "Docs", "color": "teal" })))
        .expect("project should normalize");
    let tag = normalizer
        .tag(&record(json!({ "Id": 2, "Name": "urgent" })))
        .expect("tag should normalize");

    assert_eq!(project.color().as_str(), "#10b981");
    assert_eq!(project.description(), "");
    assert_eq!(tag.color().as_str(), "#10b981");
}

#[rstest]
fn nameless_projects_and_tags_are_skipped(normalizer: Normalizer) {
    assert!(normalizer.project(&record(json!({ "Id": 1, "Name": "" }))).is_none());
    assert!(normalizer.tag(&record(json!({ "Id": 2 }))).is_none());
}

#[rstest]
fn task_record_encodes_store_schema() {
    let now = Utc::now();
    let draft = TaskDraft::new("Write spec")
        .with_priority(Priority::High)
        .with_due_date(NaiveDate::from_ymd_opt(2024, 6, 30).expect("valid date"))
        .with_tags(tag_ids(&["3", "1"]));

    let encoded = encode::task_record(&draft, now);

    assert_eq!(encoded.get(fields::NAME), Some(&json!("Write spec")));
    assert_eq!(encoded.get(fields::TITLE), Some(&json!("Write spec")));
    assert_eq!(encoded.get(fields::PRIORITY), Some(&json!("high")));
    assert_eq!(encoded.get(fields::STATUS), Some(&json!("to-do")));
    assert_eq!(encoded.get(fields::DUE_DATE), Some(&json!("2024-06-30")));
    assert_eq!(encoded.get(fields::COMPLETED_AT), Some(&Value::Null));
    assert_eq!(encoded.get(fields::PROJECT_ID), Some(&json!("")));
    assert_eq!(encoded.get(fields::TAGS), Some(&json!("3,1")));
}

#[rstest]
fn done_draft_records_completion_time() {
    let now = Utc::now();
    let draft = TaskDraft::new("Ship").with_status(TaskStatus::Done);

    let encoded = encode::task_record(&draft, now);

    let completed = encoded
        .get(fields::COMPLETED_AT)
        .and_then(Value::as_str)
        .expect("done draft should carry a completion time");
    let parsed = DateTime::parse_from_rfc3339(completed).expect("RFC 3339 timestamp");
    assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());
}

#[rstest]
#[case("17", json!(17))]
#[case("rec_17", json!("rec_17"))]
fn update_records_carry_identifier(#[case] raw_id: &str, #[case] expected: Value) {
    let id = TaskId::new(raw_id).expect("valid task id");
    let encoded = encode::status_record(&id, TaskStatus::InProgress, Utc::now());

    assert_eq!(encoded.get("Id"), Some(&expected));
    assert_eq!(encoded.get(fields::STATUS), Some(&json!("in-progress")));
    assert_eq!(encoded.get(fields::COMPLETED_AT), Some(&Value::Null));
    assert_eq!(encoded.len(), 3);
}

#[rstest]
fn project_and_tag_records_trim_names() {
    let project = encode::project_record(&ProjectDraft::new("  Docs  "));
    assert_eq!(project.get(fields::NAME), Some(&json!("Docs")));
    assert_eq!(project.get(fields::COLOR), Some(&json!("#3b82f6")));

    let tag = encode::tag_record("urgent", &HexColor::from_rgb(0xff));
    assert_eq!(tag.get(fields::COLOR), Some(&json!("#0000ff")));
}

#[rstest]
#[case(None, &[])]
#[case(Some(""), &[])]
#[case(Some("a,b"), &["a", "b"])]
#[case(Some(" b , a ,b"), &["b", "a"])]
fn tag_lists_parse_into_ordered_sets(#[case] raw: Option<&str>, #[case] expected: &[&str]) {
    assert_eq!(encode::parse_tags(raw), tag_ids(expected));
}
