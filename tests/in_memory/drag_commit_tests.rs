//! In-memory integration tests for cross-column drag commits.

use std::time::Duration;

use super::helpers::{board, project, shown, task};
use rstest::rstest;
use taskboard::board::{
    domain::{
        ActivityKind, BoardFilter, HoverTarget, NotificationLevel, Point, Progress, ProjectId,
        TaskStatus,
    },
    ports::{GatewayError, RecorderError},
    services::{BoardConfig, CommitFailure, DEFAULT_FAILURE_MESSAGE, DragOutcome, GestureOutcome},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn drop_into_other_column_persists_and_audits(project: ProjectId) -> eyre::Result<()> {
    let moved = task(project, "Write release notes", TaskStatus::Todo, 0)?;
    let board = board(&[moved.clone()], BoardConfig::default())?;

    board.controller.drag_start(moved.id())?;
    board
        .controller
        .drag_over(HoverTarget::Column(TaskStatus::InProgress))?;
    let outcome = board
        .controller
        .drag_end(Some(HoverTarget::Column(TaskStatus::InProgress)))
        .await?;
    board.controller.drain_activity().await?;

    eyre::ensure!(matches!(outcome, DragOutcome::Committed(_)));
    eyre::ensure!(
        board.gateway.status_updates()? == vec![(moved.id(), TaskStatus::InProgress)]
    );
    eyre::ensure!(shown(&board, &moved)?.status() == TaskStatus::InProgress);

    let entries = board.recorder.entries()?;
    let entry = entries
        .first()
        .ok_or_else(|| eyre::eyre!("expected one activity entry"))?;
    eyre::ensure!(entries.len() == 1);
    eyre::ensure!(entry.actor_id == board.actor_id);
    eyre::ensure!(entry.project_id == project);
    eyre::ensure!(entry.kind == ActivityKind::TaskStatusChanged);
    eyre::ensure!(entry.metadata.old_status == TaskStatus::Todo);
    eyre::ensure!(entry.metadata.new_status == TaskStatus::InProgress);
    eyre::ensure!(entry.metadata.title == "Write release notes");
    eyre::ensure!(board.notifier.shown()?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_a_task_records_completion(project: ProjectId) -> eyre::Result<()> {
    let moved = task(project, "Close sprint", TaskStatus::InProgress, 0)?
        .with_progress(Progress::new(30)?);
    let board = board(&[moved.clone()], BoardConfig::default())?;

    board.controller.drag_start(moved.id())?;
    board
        .controller
        .drag_end(Some(HoverTarget::Column(TaskStatus::Done)))
        .await?;
    board.controller.drain_activity().await?;

    let settled = shown(&board, &moved)?;
    eyre::ensure!(settled.status() == TaskStatus::Done);
    eyre::ensure!(settled.progress() == Progress::COMPLETE);
    let kinds: Vec<_> = board.recorder.entries()?.iter().map(|e| e.kind).collect();
    eyre::ensure!(kinds == vec![ActivityKind::TaskCompleted]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn gateway_failure_restores_origin_and_notifies(project: ProjectId) -> eyre::Result<()> {
    let moved = task(project, "Flaky", TaskStatus::InProgress, 4)?
        .with_progress(Progress::new(55)?);
    let board = board(&[moved.clone()], BoardConfig::default())?;
    board.gateway.set_failure(Some(GatewayError::transport(
        std::io::Error::other("connection reset"),
    )))?;

    board.controller.drag_start(moved.id())?;
    board
        .controller
        .drag_over(HoverTarget::Column(TaskStatus::Done))?;
    let outcome = board
        .controller
        .drag_end(Some(HoverTarget::Column(TaskStatus::Done)))
        .await?;
    board.controller.drain_activity().await?;

    eyre::ensure!(matches!(
        outcome,
        DragOutcome::RolledBack {
            failure: CommitFailure::Gateway(GatewayError::Transport(_)),
            ..
        }
    ));
    eyre::ensure!(shown(&board, &moved)? == moved);
    eyre::ensure!(board.recorder.attempts()? == 0);

    let notices = board.notifier.shown()?;
    eyre::ensure!(notices.len() == 1);
    eyre::ensure!(notices.iter().all(|notice| {
        notice.level == NotificationLevel::Error
            && notice.message == DEFAULT_FAILURE_MESSAGE
            && notice.task_id == Some(moved.id())
    }));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn slow_gateway_times_out_and_rolls_back(project: ProjectId) -> eyre::Result<()> {
    let moved = task(project, "Slow", TaskStatus::Todo, 0)?;
    let board = board(
        &[moved.clone()],
        BoardConfig::default().with_commit_timeout(Some(20)),
    )?;
    board.gateway.set_latency(Some(Duration::from_millis(500)))?;

    board.controller.drag_start(moved.id())?;
    let outcome = board
        .controller
        .drag_end(Some(HoverTarget::Column(TaskStatus::Done)))
        .await?;

    eyre::ensure!(matches!(
        outcome,
        DragOutcome::RolledBack {
            failure: CommitFailure::TimedOut(_),
            ..
        }
    ));
    eyre::ensure!(shown(&board, &moved)? == moved);
    eyre::ensure!(board.notifier.shown()?.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_audit_keeps_committed_move(project: ProjectId) -> eyre::Result<()> {
    let moved = task(project, "Audit me", TaskStatus::Todo, 0)?;
    let board = board(&[moved.clone()], BoardConfig::default())?;
    board
        .recorder
        .set_failure(Some(RecorderError::Rejected("audit log full".to_owned())))?;

    board.controller.drag_start(moved.id())?;
    let outcome = board
        .controller
        .drag_end(Some(HoverTarget::Column(TaskStatus::InProgress)))
        .await?;
    board.controller.drain_activity().await?;

    eyre::ensure!(matches!(outcome, DragOutcome::Committed(_)));
    eyre::ensure!(shown(&board, &moved)?.status() == TaskStatus::InProgress);
    eyre::ensure!(board.recorder.attempts()? == 1);
    eyre::ensure!(board.recorder.entries()?.is_empty());
    eyre::ensure!(board.notifier.shown()?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_deleted_remotely_rolls_back(project: ProjectId) -> eyre::Result<()> {
    let local_only = task(project, "Stale", TaskStatus::Todo, 0)?;
    let board = board(&[], BoardConfig::default())?;
    board
        .controller
        .store()
        .write(|store| store.insert(local_only.clone()))?;

    board.controller.drag_start(local_only.id())?;
    let outcome = board
        .controller
        .drag_end(Some(HoverTarget::Column(TaskStatus::Done)))
        .await?;

    eyre::ensure!(matches!(
        outcome,
        DragOutcome::RolledBack {
            failure: CommitFailure::Gateway(GatewayError::NotFound(_)),
            ..
        }
    ));
    eyre::ensure!(shown(&board, &local_only)? == local_only);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pointer_gestures_separate_click_from_drag(project: ProjectId) -> eyre::Result<()> {
    let card = task(project, "Card", TaskStatus::Todo, 0)?;
    let board = board(&[card.clone()], BoardConfig::default())?;
    let over_done = Some(HoverTarget::Column(TaskStatus::Done));

    board.controller.pointer_down(card.id(), Point::new(50, 50))?;
    let click = board
        .controller
        .pointer_up(Point::new(54, 53), over_done)
        .await?;
    eyre::ensure!(matches!(click, GestureOutcome::OpenDetail(id) if id == card.id()));
    eyre::ensure!(board.gateway.status_updates()?.is_empty());

    board.controller.pointer_down(card.id(), Point::new(50, 50))?;
    board.controller.pointer_move(Point::new(80, 50), over_done)?;
    let columns = board.controller.columns(&BoardFilter::new())?;
    eyre::ensure!(columns.column(TaskStatus::Done).len() == 1);
    let drag = board
        .controller
        .pointer_up(Point::new(80, 50), over_done)
        .await?;
    board.controller.drain_activity().await?;

    eyre::ensure!(matches!(drag, GestureOutcome::Drag(DragOutcome::Committed(_))));
    eyre::ensure!(board.gateway.status_updates()? == vec![(card.id(), TaskStatus::Done)]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn touch_config_waits_for_hold(project: ProjectId) -> eyre::Result<()> {
    let card = task(project, "Touch", TaskStatus::Todo, 0)?;
    let board = board(&[card.clone()], BoardConfig::touch())?;

    board.controller.pointer_down(card.id(), Point::new(0, 0))?;
    board
        .controller
        .pointer_move(Point::new(40, 0), Some(HoverTarget::Column(TaskStatus::Done)))?;
    let outcome = board
        .controller
        .pointer_up(Point::new(40, 0), Some(HoverTarget::Column(TaskStatus::Done)))
        .await?;

    eyre::ensure!(matches!(outcome, GestureOutcome::Ignored));
    eyre::ensure!(shown(&board, &card)? == card);
    eyre::ensure!(board.gateway.status_updates()?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn dropping_the_controller_lets_audit_writes_finish(project: ProjectId) -> eyre::Result<()> {
    let moved = task(project, "Hand over", TaskStatus::Todo, 0)?;
    let board = board(&[moved.clone()], BoardConfig::default())?;

    board.controller.drag_start(moved.id())?;
    let outcome = board
        .controller
        .drag_end(Some(HoverTarget::Column(TaskStatus::Done)))
        .await?;
    eyre::ensure!(matches!(outcome, DragOutcome::Committed(_)));
    eyre::ensure!(board.recorder.entries()?.is_empty());

    drop(board.controller);
    tokio::time::sleep(Duration::from_millis(20)).await;

    let entries = board.recorder.entries()?;
    eyre::ensure!(entries.len() == 1);
    eyre::ensure!(entries.iter().all(|entry| entry.kind == ActivityKind::TaskCompleted));
    Ok(())
}
