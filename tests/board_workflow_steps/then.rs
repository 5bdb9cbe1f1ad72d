//! Then steps for board workflow BDD scenarios.

use super::world::BoardWorld;
use rstest_bdd_macros::then;
use taskflow::board::{
    adapters::memory::StoreOperation,
    domain::{Priority, TaskStatus},
    ports::NotificationLevel,
};

#[then(r#"the task "{title}" has status "{status}""#)]
fn task_has_status(world: &BoardWorld, title: String, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.task_titled(&title)?;
    eyre::ensure!(
        task.status() == Some(expected),
        "expected status {expected}, found {}",
        task.stored_status()
    );
    Ok(())
}

#[then(r#"the task "{title}" has priority "{priority}""#)]
fn task_has_priority(
    world: &BoardWorld,
    title: String,
    priority: String,
) -> Result<(), eyre::Report> {
    let expected = Priority::try_from(priority.as_str())
        .map_err(|err| eyre::eyre!("invalid expected priority in scenario: {err}"))?;
    let task = world.task_titled(&title)?;
    eyre::ensure!(
        task.priority() == expected,
        "expected priority {expected}, found {}",
        task.priority()
    );
    Ok(())
}

#[then(r#"the task "{title}" has no completion time"#)]
fn task_not_completed(world: &BoardWorld, title: String) -> Result<(), eyre::Report> {
    let task = world.task_titled(&title)?;
    eyre::ensure!(
        task.completed_at().is_none(),
        "expected no completion time, found {:?}",
        task.completed_at()
    );
    Ok(())
}

#[then(r#"the task "{title}" has a completion time"#)]
fn task_completed(world: &BoardWorld, title: String) -> Result<(), eyre::Report> {
    let task = world.task_titled(&title)?;
    eyre::ensure!(task.completed_at().is_some(), "expected a completion time");
    Ok(())
}

#[then("the overdue count is {count:usize}")]
fn overdue_count(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let overdue = world.controller.stats().overdue;
    eyre::ensure!(overdue == count, "expected {count} overdue tasks, found {overdue}");
    Ok(())
}

#[then(r#"only "{title}" is visible"#)]
fn only_visible(world: &BoardWorld, title: String) -> Result<(), eyre::Report> {
    let titles: Vec<String> = world
        .controller
        .visible_tasks()
        .iter()
        .map(|task| task.title().to_owned())
        .collect();
    eyre::ensure!(
        titles.len() == 1 && titles.first() == Some(&title),
        "expected only {title:?}, found {titles:?}"
    );
    Ok(())
}

#[then(r#"an error notification says "{message}""#)]
fn error_notification(world: &BoardWorld, message: String) -> Result<(), eyre::Report> {
    let errors = world.notifier.messages(NotificationLevel::Error);
    eyre::ensure!(errors.contains(&message), "expected {message:?} among {errors:?}");
    eyre::ensure!(
        world.last_result.as_ref().is_some_and(Result::is_err),
        "the operation should have failed"
    );
    Ok(())
}

#[then("the store received no task writes")]
fn no_task_writes(world: &BoardWorld) -> Result<(), eyre::Report> {
    let creates = world.store.call_count(StoreOperation::Create)?;
    let updates = world.store.call_count(StoreOperation::Update)?;
    eyre::ensure!(
        creates == 0 && updates == 0,
        "expected no writes, found {creates} creates and {updates} updates"
    );
    Ok(())
}

#[then("the detail view is closed")]
fn detail_view_closed(world: &BoardWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.controller.selected_task().is_none(),
        "expected the detail view to be closed"
    );
    Ok(())
}

#[then("the board has {count:usize} tasks")]
fn board_task_count(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let total = world.controller.tasks().len();
    eyre::ensure!(total == count, "expected {count} tasks, found {total}");
    Ok(())
}
