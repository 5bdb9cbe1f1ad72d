//! In-memory integration tests for task workflows.

use chrono::{Duration, Utc};
use taskflow::board::{
    adapters::memory::StoreOperation,
    domain::{Priority, RecordId, TaskDraft, TaskId, TaskStatus},
    ports::{Collection, NotificationLevel},
    view::{PriorityFilter, StatusFilter, TaskFilter},
};
use rstest::rstest;

use super::helpers::{Board, board, create_all};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn write_spec_scenario(board: Board) -> eyre::Result<()> {
    let draft = TaskDraft::new("Write spec").with_priority(Priority::High);

    let task = board.controller.create_task(&draft).await?;

    eyre::ensure!(task.status() == Some(TaskStatus::ToDo), "status should be to-do");
    eyre::ensure!(task.completed_at().is_none(), "completedAt should be null");
    eyre::ensure!(task.priority() == Priority::High, "priority should be high");

    let stored = board
        .store
        .get(Collection::Tasks, task.id().record_id())?
        .ok_or_else(|| eyre::eyre!("created record missing from store"))?;
    eyre::ensure!(
        stored.get("Name") == stored.get("title"),
        "display name should mirror the title"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_tasks_are_listed_newest_first(board: Board) -> eyre::Result<()> {
    let created = create_all(&board.controller, &["first", "second", "third"]).await?;

    let mut listed = board.controller.tasks();
    eyre::ensure!(listed.len() == 3, "expected three tasks, found {}", listed.len());
    eyre::ensure!(
        listed
            .windows(2)
            .all(|pair| matches!(pair, [newer, older] if newer.created_at() >= older.created_at())),
        "tasks should be ordered by creation time, newest first"
    );
    listed.sort_by_key(|task| task.created_at());
    let titles: Vec<&str> = listed.iter().map(|task| task.title()).collect();
    eyre::ensure!(titles == ["first", "second", "third"], "unexpected titles {titles:?}");

    for task in &created {
        eyre::ensure!(
            board.controller.task(task.id()).as_ref() == Some(task),
            "task {} missing from snapshot",
            task.id()
        );
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn done_and_back_scenario(board: Board) -> eyre::Result<()> {
    let task = board
        .controller
        .create_task(&TaskDraft::new("Review").with_status(TaskStatus::InProgress))
        .await?;

    let done = board.controller.change_status(task.id(), TaskStatus::Done).await?;
    let completed = done
        .completed_at()
        .ok_or_else(|| eyre::eyre!("done task should carry completedAt"))?;
    eyre::ensure!(completed <= Utc::now(), "completedAt must not be in the future");

    let reopened = board.controller.change_status(task.id(), TaskStatus::ToDo).await?;
    eyre::ensure!(reopened.completed_at().is_none(), "completedAt should be cleared");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overdue_statistic_scenario(board: Board) -> eyre::Result<()> {
    let yesterday = (Utc::now() - Duration::days(1)).date_naive();
    let task = board
        .controller
        .create_task(&TaskDraft::new("Late").with_due_date(yesterday))
        .await?;
    eyre::ensure!(board.controller.stats().overdue == 1, "task should be overdue");

    board.controller.change_status(task.id(), TaskStatus::Done).await?;
    let stats = board.controller.stats();
    eyre::ensure!(stats.overdue == 0, "done task is never overdue");
    eyre::ensure!(stats.completed == 1, "done task counts as completed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_with_status_filter_scenario(board: Board) -> eyre::Result<()> {
    board.controller.create_task(&TaskDraft::new("Write spec")).await?;
    let shipped = board
        .controller
        .create_task(&TaskDraft::new("Ship spec").with_status(TaskStatus::Done))
        .await?;

    board.controller.set_filter(
        TaskFilter::new()
            .with_query("spec")
            .with_status(StatusFilter::Only(TaskStatus::Done)),
    );

    let visible = board.controller.visible_tasks();
    eyre::ensure!(visible == vec![shipped], "only the done task should match");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_columns_apply_priority_but_not_status(board: Board) -> eyre::Result<()> {
    let urgent = board
        .controller
        .create_task(&TaskDraft::new("Urgent").with_priority(Priority::High))
        .await?;
    board
        .controller
        .create_task(&TaskDraft::new("Later").with_priority(Priority::Low))
        .await?;
    board.controller.set_status_filter(StatusFilter::Only(TaskStatus::Done));
    board
        .controller
        .set_priority_filter(PriorityFilter::Only(Priority::High));

    let column = board.controller.board_column(TaskStatus::ToDo);
    eyre::ensure!(column == vec![urgent], "column should show the high-priority task");
    eyre::ensure!(
        board.controller.visible_tasks().is_empty(),
        "top-level view applies the status filter"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_closes_open_detail_view(board: Board) -> eyre::Result<()> {
    let task = board.controller.create_task(&TaskDraft::new("Doomed")).await?;
    board.controller.open_details(task.id())?;

    board.controller.delete_task(task.id()).await?;

    eyre::ensure!(board.controller.selected_task().is_none(), "detail view should close");
    eyre::ensure!(board.controller.tasks().is_empty(), "task should be gone");
    eyre::ensure!(
        board
            .notifier
            .messages(NotificationLevel::Success)
            .last()
            .map(String::as_str)
            == Some("Task deleted successfully"),
        "delete should be announced"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_reload_keeps_the_write_and_the_old_snapshot(board: Board) -> eyre::Result<()> {
    let first = board.controller.create_task(&TaskDraft::new("first")).await?;
    board.store.fail_operation(StoreOperation::List, "timeout")?;

    let second = board.controller.create_task(&TaskDraft::new("second")).await?;

    eyre::ensure!(board.controller.tasks() == vec![first], "snapshot should be unchanged");
    eyre::ensure!(
        board
            .store
            .get(Collection::Tasks, second.id().record_id())?
            .is_some(),
        "the write itself succeeded"
    );
    eyre::ensure!(
        board.notifier.messages(NotificationLevel::Error) == ["Failed to load tasks"],
        "reload failure should be reported"
    );

    board.store.recover_operation(StoreOperation::List)?;
    board.controller.reload_tasks().await?;
    eyre::ensure!(board.controller.tasks().len() == 2, "reload should catch up");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_status_records_stay_off_the_board(board: Board) -> eyre::Result<()> {
    board.store.seed(
        Collection::Tasks,
        [
            serde_json::json!({ "Id": 1, "Name": "Normal", "status": "to-do" }),
            serde_json::json!({ "Id": 2, "Name": "Odd", "status": "blocked" }),
        ]
        .into_iter()
        .filter_map(|value| value.as_object().cloned()),
    )?;

    board.controller.reload_tasks().await?;

    eyre::ensure!(board.controller.tasks().len() == 2, "both tasks are loaded");
    let placed: usize = TaskStatus::COLUMNS
        .into_iter()
        .map(|status| board.controller.board_column(status).len())
        .sum();
    eyre::ensure!(placed == 1, "only the canonical task is placed");
    eyre::ensure!(board.controller.stats().total == 2, "stats count every task");
    let odd = board
        .controller
        .task(&TaskId::from(RecordId::from(2_u64)))
        .ok_or_else(|| eyre::eyre!("odd task missing"))?;
    eyre::ensure!(odd.status().is_none(), "status stays unrecognized");
    Ok(())
}
