//! Given steps for board workflow BDD scenarios.

use super::world::{BoardWorld, run_async};
use chrono::{Duration, Utc};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskflow::board::domain::{TaskDraft, TaskStatus};

#[given("an empty board")]
fn empty_board(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    run_async(world.controller.load()).wrap_err("load empty board")?;
    eyre::ensure!(world.controller.tasks().is_empty(), "board should start empty");
    Ok(())
}

#[given(r#"a task "{title}" with status "{status}""#)]
fn task_with_status(
    world: &mut BoardWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let parsed = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    run_async(
        world
            .controller
            .create_task(&TaskDraft::new(title).with_status(parsed)),
    )
    .wrap_err("create task for scenario setup")?;
    Ok(())
}

#[given(r#"a task "{title}" due yesterday"#)]
fn task_due_yesterday(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    let yesterday = (Utc::now() - Duration::days(1)).date_naive();
    run_async(
        world
            .controller
            .create_task(&TaskDraft::new(title).with_due_date(yesterday)),
    )
    .wrap_err("create overdue task for scenario setup")?;
    Ok(())
}

#[given(r#"the task "{title}" is open in the detail view"#)]
fn task_open_in_details(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    let task = world.task_titled(&title)?;
    world
        .controller
        .open_details(task.id())
        .wrap_err("open detail view")?;
    Ok(())
}
