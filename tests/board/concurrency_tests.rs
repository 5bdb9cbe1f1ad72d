//! In-memory integration tests for concurrent workflow operations.

use std::sync::Arc;

use rstest::rstest;
use taskflow::board::{
    adapters::memory::StoreOperation,
    domain::{TaskDraft, TaskStatus},
    services::{OperationKind, OperationState, WorkflowError},
};

use super::helpers::{Board, board, create_all, wait_until_held};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_submit_fails_fast_while_in_flight(board: Board) -> eyre::Result<()> {
    board.store.hold_next(StoreOperation::Create)?;
    let controller = Arc::clone(&board.controller);
    let first = tokio::spawn(async move { controller.create_task(&TaskDraft::new("once")).await });
    wait_until_held(&board.store, StoreOperation::Create).await?;

    eyre::ensure!(board.controller.busy_flags().submitting, "submit should be busy");
    let second = board.controller.create_task(&TaskDraft::new("twice")).await;
    eyre::ensure!(
        matches!(second, Err(WorkflowError::Busy(_))),
        "expected busy error, got {second:?}"
    );

    board.store.release(StoreOperation::Create)?;
    first.await??;

    eyre::ensure!(!board.controller.busy_flags().submitting, "submit should be idle");
    eyre::ensure!(board.controller.tasks().len() == 1, "only one task was created");
    eyre::ensure!(
        board.store.call_count(StoreOperation::Create)? == 1,
        "the busy submit never reached the store"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn operations_on_different_tasks_interleave(board: Board) -> eyre::Result<()> {
    let tasks = create_all(&board.controller, &["remove me", "move me"]).await?;
    let [removed, moved] = tasks.as_slice() else {
        eyre::bail!("expected two tasks");
    };

    board.store.hold_next(StoreOperation::Delete)?;
    let controller = Arc::clone(&board.controller);
    let removed_id = removed.id().clone();
    let deletion = tokio::spawn(async move { controller.delete_task(&removed_id).await });
    wait_until_held(&board.store, StoreOperation::Delete).await?;
    eyre::ensure!(board.controller.busy_flags().deleting, "delete should be busy");

    let updated = board
        .controller
        .change_status(moved.id(), TaskStatus::InProgress)
        .await?;
    eyre::ensure!(
        updated.status() == Some(TaskStatus::InProgress),
        "status change completes while the delete is held"
    );

    board.store.release(StoreOperation::Delete)?;
    deletion.await??;

    let remaining = board.controller.tasks();
    eyre::ensure!(remaining.len() == 1, "one task should remain");
    eyre::ensure!(
        remaining.first().and_then(|task| task.status()) == Some(TaskStatus::InProgress),
        "the remaining task keeps its new status"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_reload_does_not_overwrite_a_newer_snapshot(board: Board) -> eyre::Result<()> {
    board.store.hold_next(StoreOperation::List)?;
    let controller = Arc::clone(&board.controller);
    let slow_reload = tokio::spawn(async move { controller.reload_tasks().await });
    wait_until_held(&board.store, StoreOperation::List).await?;

    let created = board.controller.create_task(&TaskDraft::new("fresh")).await?;

    board.store.release(StoreOperation::List)?;
    let installed = slow_reload.await??;

    eyre::ensure!(!installed, "the slow reload should be discarded");
    eyre::ensure!(
        board.controller.tasks() == vec![created],
        "the newer snapshot must survive"
    );
    eyre::ensure!(board.controller.stats().total == 1, "stats follow the newer snapshot");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_operation_returns_to_idle(board: Board) -> eyre::Result<()> {
    board.store.hold_next(StoreOperation::Create)?;
    let controller = Arc::clone(&board.controller);
    let pending = tokio::spawn(async move {
        controller
            .create_task(&TaskDraft::new("abandoned"))
            .await
    });
    wait_until_held(&board.store, StoreOperation::Create).await?;

    pending.abort();
    let joined = pending.await;
    eyre::ensure!(
        joined.as_ref().is_err_and(tokio::task::JoinError::is_cancelled),
        "task should be cancelled"
    );

    eyre::ensure!(
        board.controller.operation_state(OperationKind::CreateTask, None) == OperationState::Idle,
        "cancellation returns the operation to idle"
    );
    eyre::ensure!(!board.controller.busy_flags().submitting, "submit should be idle");
    board.store.release(StoreOperation::Create)?;
    Ok(())
}
