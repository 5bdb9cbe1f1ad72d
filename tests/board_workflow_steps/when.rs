//! When steps for board workflow BDD scenarios.

use super::world::{BoardWorld, run_async};
use rstest_bdd_macros::when;
use taskflow::board::{
    domain::{Priority, TaskDraft, TaskStatus},
    view::{StatusFilter, TaskFilter},
};

#[when(r#"I create a task "{title}" with priority "{priority}""#)]
fn create_task(
    world: &mut BoardWorld,
    title: String,
    priority: String,
) -> Result<(), eyre::Report> {
    let parsed = Priority::try_from(priority.as_str())
        .map_err(|err| eyre::eyre!("invalid priority in scenario: {err}"))?;
    let draft = TaskDraft::new(title).with_priority(parsed);
    world.last_result = Some(run_async(world.controller.create_task(&draft)));
    Ok(())
}

#[when("I create a task with a blank title")]
fn create_blank_task(world: &mut BoardWorld) {
    world.last_result = Some(run_async(world.controller.create_task(&TaskDraft::new("  "))));
}

#[when(r#"I move "{title}" to "{status}""#)]
fn move_task(world: &mut BoardWorld, title: String, status: String) -> Result<(), eyre::Report> {
    let parsed = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let task = world.task_titled(&title)?;
    world.last_result = Some(run_async(world.controller.change_status(task.id(), parsed)));
    Ok(())
}

#[when(r#"I search for "{query}" with status filter "{status}""#)]
fn search_with_status(
    world: &mut BoardWorld,
    query: String,
    status: String,
) -> Result<(), eyre::Report> {
    let parsed = StatusFilter::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status filter in scenario: {err}"))?;
    world
        .controller
        .set_filter(TaskFilter::new().with_query(query).with_status(parsed));
    Ok(())
}

#[when(r#"I delete "{title}""#)]
fn delete_task(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    let task = world.task_titled(&title)?;
    run_async(world.controller.delete_task(task.id()))?;
    Ok(())
}
