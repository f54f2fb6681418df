//! In-memory integration tests for column ordering and remote refresh.

use super::helpers::{board, project, shown, task};
use rstest::rstest;
use taskboard::board::{
    domain::{BoardColumns, BoardFilter, ProjectId, Task, TaskId, TaskStatus},
    ports::GatewayError,
    services::{BoardConfig, BoardError, ReorderOutcome},
};

fn column_ids(columns: &BoardColumns, status: TaskStatus) -> Vec<TaskId> {
    columns.column(status).iter().map(Task::id).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn explicit_order_is_persisted(project: ProjectId) -> eyre::Result<()> {
    let a = task(project, "A", TaskStatus::InProgress, 0)?;
    let b = task(project, "B", TaskStatus::InProgress, 1)?;
    let c = task(project, "C", TaskStatus::InProgress, 2)?;
    let board = board(&[a.clone(), b.clone(), c.clone()], BoardConfig::default())?;

    let outcome = board
        .controller
        .persist_column_order(TaskStatus::InProgress, &[c.id(), a.id(), b.id()])
        .await?;

    eyre::ensure!(matches!(outcome, ReorderOutcome::Applied));
    let columns = board.controller.columns(&BoardFilter::new())?;
    eyre::ensure!(column_ids(&columns, TaskStatus::InProgress) == vec![c.id(), a.id(), b.id()]);
    eyre::ensure!(
        board.gateway.reorders()? == vec![vec![(c.id(), 0), (a.id(), 1), (b.id(), 2)]]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_order_is_rolled_back(project: ProjectId) -> eyre::Result<()> {
    let a = task(project, "A", TaskStatus::Todo, 0)?;
    let b = task(project, "B", TaskStatus::Todo, 1)?;
    let board = board(&[a.clone(), b.clone()], BoardConfig::default())?;
    board
        .gateway
        .set_failure(Some(GatewayError::Rejected("order conflict".to_owned())))?;

    let outcome = board
        .controller
        .persist_column_order(TaskStatus::Todo, &[b.id(), a.id()])
        .await?;

    eyre::ensure!(matches!(outcome, ReorderOutcome::RolledBack(_)));
    eyre::ensure!(shown(&board, &a)? == a);
    eyre::ensure!(shown(&board, &b)? == b);
    eyre::ensure!(board.notifier.shown()?.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn drag_within_column_never_reorders_remotely(project: ProjectId) -> eyre::Result<()> {
    let a = task(project, "A", TaskStatus::Todo, 0)?;
    let b = task(project, "B", TaskStatus::Todo, 1)?;
    let board = board(&[a.clone(), b.clone()], BoardConfig::default())?;

    board.controller.drag_start(b.id())?;
    board.controller.drag_over(a.id().into())?;
    board.controller.drag_end(Some(a.id().into())).await?;

    eyre::ensure!(board.gateway.reorders()?.is_empty());
    eyre::ensure!(board.gateway.status_updates()?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refresh_picks_up_remote_changes(project: ProjectId) -> eyre::Result<()> {
    let local = task(project, "Shared", TaskStatus::Todo, 0)?;
    let board = board(&[local.clone()], BoardConfig::default())?;
    let remote = local.clone().with_status(TaskStatus::Done).with_order_index(7);
    board.gateway.seed([remote.clone()])?;

    let refreshed = board.controller.refresh_task(local.id()).await?;

    eyre::ensure!(refreshed == Some(remote.clone()));
    eyre::ensure!(shown(&board, &local)? == remote);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refresh_adds_tasks_created_elsewhere(project: ProjectId) -> eyre::Result<()> {
    let board = board(&[], BoardConfig::default())?;
    let created = task(project, "New", TaskStatus::InProgress, 0)?;
    board.gateway.seed([created.clone()])?;

    board.controller.refresh_task(created.id()).await?;

    let columns = board.controller.columns(&BoardFilter::new())?;
    eyre::ensure!(column_ids(&columns, TaskStatus::InProgress) == vec![created.id()]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refresh_surfaces_transport_errors(project: ProjectId) -> eyre::Result<()> {
    let local = task(project, "Offline", TaskStatus::Todo, 0)?;
    let board = board(&[local.clone()], BoardConfig::default())?;
    board.gateway.set_failure(Some(GatewayError::transport(
        std::io::Error::other("offline"),
    )))?;

    let result = board.controller.refresh_task(local.id()).await;

    eyre::ensure!(matches!(result, Err(BoardError::Gateway(GatewayError::Transport(_)))));
    eyre::ensure!(shown(&board, &local)? == local);
    Ok(())
}
