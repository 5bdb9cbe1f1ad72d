//! Drives a task board over the in-memory record store and logs each step.
//!
//! Usage:
//!
//! ```text
//! taskflow_demo [config-path]
//! ```
//!
//! When `config-path` is given it must name a TOML board configuration;
//! otherwise compiled defaults are used. Output is emitted through
//! `tracing`, filtered by `RUST_LOG` (default `info`).

use std::{env, path::PathBuf, sync::Arc};

use mockable::DefaultClock;
use taskflow::{
    board::{
        adapters::{TracingNotifier, memory::InMemoryRecordStore},
        domain::{Priority, ProjectDraft, TaskDraft, TaskStatus},
        services::TaskWorkflowController,
        view::TaskFilter,
    },
    config::BoardConfig,
    telemetry::init_tracing,
};
use tracing::info;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_tracing("info")?;
    let config = load_config(env::args_os().nth(1).map(PathBuf::from))?;
    run(config).await
}

fn load_config(path: Option<PathBuf>) -> Result<BoardConfig, BoxError> {
    match path {
        Some(config_path) => Ok(BoardConfig::load(config_path)?),
        None => Ok(BoardConfig::default()),
    }
}

async fn run(config: BoardConfig) -> Result<(), BoxError> {
    let controller = TaskWorkflowController::new(
        Arc::new(InMemoryRecordStore::new()),
        Arc::new(TracingNotifier),
        Arc::new(DefaultClock),
        config,
    );
    controller.load().await?;

    let project = controller
        .create_project(&ProjectDraft::new("Launch"))
        .await?;
    let tag = controller.create_tag("docs", None).await?;

    let spec = controller
        .create_task(
            &TaskDraft::new("Write spec")
                .with_priority(Priority::High)
                .with_project(project.id().clone())
                .with_tags([tag.id().clone()]),
        )
        .await?;
    controller
        .create_task(&TaskDraft::new("Review spec").with_status(TaskStatus::InProgress))
        .await?;
    controller
        .change_status(spec.id(), TaskStatus::Done)
        .await?;

    for status in TaskStatus::COLUMNS {
        let column = controller.board_column(status);
        info!(column = %status.label(), count = column.len(), "board column");
    }

    controller.set_filter(TaskFilter::new().with_query("review"));
    let visible = controller.visible_tasks();
    info!(count = visible.len(), "tasks matching \"review\"");

    let stats = controller.stats();
    info!(
        total = stats.total,
        completed = stats.completed,
        pending = stats.pending,
        overdue = stats.overdue,
        "board statistics"
    );
    Ok(())
}
