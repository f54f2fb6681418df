//! Drag session controller: turns pointer gestures into board transitions.
//!
//! Moves are applied to the shared store optimistically while the gesture is
//! in flight. Releasing over another column commits the new status through
//! the [`TaskGateway`]; a failed commit restores the origin placement and
//! notifies the user. Same-column reordering is tracked visually but never
//! written.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use mockable::Clock;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::BoardConfig;
use crate::board::{
    domain::{
        ActivityEntry, ActorId, BoardColumns, BoardFilter, DragSession, GestureEvent, GestureRelease,
        GestureTracker, HoverTarget, Notification, OriginSnapshot, Point, ReopenProgress,
        SharedTaskStore, StoreLockError, Task, TaskEntry, TaskId, TaskStatus, TaskStore,
        partition,
    },
    ports::{ActivityRecorder, BoardNotifier, GatewayError, GatewayResult, TaskGateway},
};

/// Service-level errors for board operations.
///
/// Remote commit failures are not errors at this level: they are recovered
/// by rollback and reported through [`DragOutcome::RolledBack`].
#[derive(Debug, Error)]
pub enum BoardError {
    /// The shared task store lock was poisoned.
    #[error(transparent)]
    Store(#[from] StoreLockError),
    /// Controller-internal state was poisoned by a panic.
    #[error("board controller state poisoned: {0}")]
    StatePoisoned(String),
    /// A non-drag gateway call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Result type for board service operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Why a remote commit did not go through.
#[derive(Debug, Clone, Error)]
pub enum CommitFailure {
    /// The gateway returned an error.
    #[error(transparent)]
    Gateway(GatewayError),
    /// The gateway did not answer within the configured timeout.
    #[error("remote commit timed out after {0:?}")]
    TimedOut(Duration),
}

/// Result of [`DragSessionController::drag_start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragStartOutcome {
    /// A session was opened.
    Started(DragSession),
    /// The task is not on the board or still has a commit in flight.
    Ignored,
}

/// Result of [`DragSessionController::drag_over`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOverOutcome {
    /// The dragged task was optimistically moved to another column.
    Moved(TaskStatus),
    /// Same-column hover, repeated hover, or nothing to change.
    Unchanged,
    /// No session is active, the dragged task vanished, or the hovered task
    /// is unknown.
    Ignored,
}

/// Result of finishing a drag gesture.
#[derive(Debug, Clone)]
pub enum DragOutcome {
    /// No session, no valid target, or the dragged task vanished.
    Cancelled,
    /// Released over the origin column; nothing was written.
    Unchanged,
    /// The new status was confirmed remotely.
    Committed(Task),
    /// The remote write failed and the task was restored.
    RolledBack {
        /// Task that was restored.
        task_id: TaskId,
        /// Cause of the failure.
        failure: CommitFailure,
    },
}

/// Result of releasing the pointer.
#[derive(Debug, Clone)]
pub enum GestureOutcome {
    /// The gesture was a click: the task detail view should open.
    OpenDetail(TaskId),
    /// The gesture was a drag.
    Drag(DragOutcome),
    /// No gesture was in progress or it was aborted before activation.
    Ignored,
}

/// Result of [`DragSessionController::persist_column_order`].
#[derive(Debug, Clone)]
pub enum ReorderOutcome {
    /// The order was written remotely.
    Applied,
    /// The remote write failed and the previous order was restored.
    RolledBack(CommitFailure),
    /// Some task was missing, busy, or outside the column.
    Ignored,
}

/// External collaborators used by the controller.
#[derive(Debug)]
pub struct BoardPorts<G, R, N> {
    /// Remote task store.
    pub gateway: Arc<G>,
    /// Audit log writer.
    pub recorder: Arc<R>,
    /// User notification sink.
    pub notifier: Arc<N>,
}

enum Resolution {
    DraggedMissing,
    TargetMissing,
    SameColumn,
    Moved(TaskStatus),
}

/// Coordinates drag sessions over one board.
pub struct DragSessionController<G, R, N, C>
where
    G: TaskGateway,
    R: ActivityRecorder + 'static,
    N: BoardNotifier,
    C: Clock + Send + Sync,
{
    store: SharedTaskStore,
    gateway: Arc<G>,
    recorder: Arc<R>,
    notifier: Arc<N>,
    clock: Arc<C>,
    actor_id: ActorId,
    config: BoardConfig,
    session: Mutex<Option<DragSession>>,
    gesture: Mutex<GestureTracker>,
    activity: Mutex<JoinSet<()>>,
}

fn lock<T>(mutex: &Mutex<T>) -> BoardResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|err| BoardError::StatePoisoned(err.to_string()))
}

fn resolve_target(store: &TaskStore, target: HoverTarget) -> Option<TaskStatus> {
    match target {
        HoverTarget::Column(status) => Some(status),
        HoverTarget::Task(task_id) => store.get(task_id).map(Task::status),
    }
}

impl<G, R, N, C> Drop for DragSessionController<G, R, N, C>
where
    G: TaskGateway,
    R: ActivityRecorder + 'static,
    N: BoardNotifier,
    C: Clock + Send + Sync,
{
    fn drop(&mut self) {
        let pending = self
            .activity
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        let outstanding = pending.len();
        pending.detach_all();
        if outstanding > 0 {
            debug!(outstanding, "detaching in-flight audit writes");
        }
    }
}

/// Rebuilds the optimistic placement for `status` from the drag origin.
///
/// Each hover starts again from the origin, so passing over `done` on the
/// way to another column leaves no forced progress behind.
fn project(
    task: &mut Task,
    origin: OriginSnapshot,
    status: TaskStatus,
    reopen: ReopenProgress,
    clock: &impl Clock,
) {
    task.restore(origin);
    task.move_to(status, reopen, clock);
}

/// Applies local progress invariants to a remotely confirmed task.
fn settle(confirmed: Task, origin: OriginSnapshot, reopen: ReopenProgress) -> Task {
    let status = confirmed.status();
    let settled = confirmed.with_status(status);
    match (origin.status, status, reopen) {
        (TaskStatus::Done, TaskStatus::Todo | TaskStatus::InProgress, ReopenProgress::Reset(progress)) => {
            settled.with_progress(progress)
        }
        _ => settled,
    }
}

impl<G, R, N, C> DragSessionController<G, R, N, C>
where
    G: TaskGateway,
    R: ActivityRecorder + 'static,
    N: BoardNotifier,
    C: Clock + Send + Sync,
{
    /// Creates a controller with the default configuration.
    #[must_use]
    pub fn new(
        store: SharedTaskStore,
        ports: BoardPorts<G, R, N>,
        clock: Arc<C>,
        actor_id: ActorId,
    ) -> Self {
        let config = BoardConfig::default();
        Self {
            store,
            gateway: ports.gateway,
            recorder: ports.recorder,
            notifier: ports.notifier,
            clock,
            actor_id,
            gesture: Mutex::new(GestureTracker::new(config.activation)),
            config,
            session: Mutex::new(None),
            activity: Mutex::new(JoinSet::new()),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: BoardConfig) -> Self {
        self.gesture = Mutex::new(GestureTracker::new(config.activation));
        self.config = config;
        self
    }

    /// Returns the configuration in force.
    #[must_use]
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Returns the shared store this controller mutates.
    #[must_use]
    pub const fn store(&self) -> &SharedTaskStore {
        &self.store
    }

    /// Partitions the current store into columns.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] if the store lock is poisoned.
    pub fn columns(&self, filter: &BoardFilter) -> BoardResult<BoardColumns> {
        Ok(self.store.read(|store| partition(store, filter))?)
    }

    /// Returns a copy of the active drag session, for the drag overlay.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::StatePoisoned`] if the session lock is poisoned.
    pub fn active_session(&self) -> BoardResult<Option<DragSession>> {
        Ok(lock(&self.session)?.clone())
    }

    /// Returns `true` while `task_id` is being dragged, in which case its
    /// click-to-open behaviour is suppressed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::StatePoisoned`] if the session lock is poisoned.
    pub fn is_drag_subject(&self, task_id: TaskId) -> BoardResult<bool> {
        Ok(lock(&self.session)?
            .as_ref()
            .is_some_and(|session| session.dragged_task_id() == task_id))
    }

    /// Opens a drag session for `task_id`.
    ///
    /// Unknown tasks and tasks with a commit still in flight are ignored. An
    /// already active session is discarded and its task restored first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] only if internal locks are poisoned.
    pub fn drag_start(&self, task_id: TaskId) -> BoardResult<DragStartOutcome> {
        let mut session = lock(&self.session)?;
        let previous = session
            .as_ref()
            .map(|active| (active.dragged_task_id(), active.origin()));
        // The previous projection is undone before the new origin is read, so
        // re-dragging the same card never snapshots a hover column.
        let origin = self.store.write(|store| {
            if !matches!(store.entry(task_id), Some(TaskEntry::Stable(_))) {
                return None;
            }
            if let Some((previous_id, previous_origin)) = previous {
                store.update_stable(previous_id, |task| task.restore(previous_origin));
            }
            store.get(task_id).map(Task::origin_snapshot)
        })?;
        let Some(origin) = origin else {
            debug!(%task_id, "ignoring drag start for unknown or pending task");
            return Ok(DragStartOutcome::Ignored);
        };

        let started = DragSession::new(task_id, origin);
        *session = Some(started.clone());
        debug!(%task_id, status = %origin.status, "drag session started");
        Ok(DragStartOutcome::Started(started))
    }

    /// Updates the optimistic placement for the current hover target.
    ///
    /// Hovering a different column, or a task in a different column, moves
    /// the dragged task there. Hovering within its current column changes
    /// nothing. Repeating the previous target is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] only if internal locks are poisoned.
    pub fn drag_over(&self, target: HoverTarget) -> BoardResult<DragOverOutcome> {
        let mut guard = lock(&self.session)?;
        let Some(session) = guard.as_mut() else {
            return Ok(DragOverOutcome::Ignored);
        };
        if session.hover_target() == Some(target) {
            return Ok(DragOverOutcome::Unchanged);
        }

        let dragged = session.dragged_task_id();
        let origin = session.origin();
        let reopen = self.config.reopen_progress;
        let clock = &*self.clock;
        let resolution = self.store.write(|store| {
            let Some(current) = store.get(dragged).map(Task::status) else {
                return Resolution::DraggedMissing;
            };
            match resolve_target(store, target) {
                None => Resolution::TargetMissing,
                Some(status) if status == current => Resolution::SameColumn,
                Some(status) => {
                    store.update_stable(dragged, |task| {
                        project(task, origin, status, reopen, clock);
                    });
                    Resolution::Moved(status)
                }
            }
        })?;

        match resolution {
            Resolution::DraggedMissing => {
                debug!(task_id = %dragged, "dragged task vanished, discarding session");
                *guard = None;
                Ok(DragOverOutcome::Ignored)
            }
            Resolution::TargetMissing => Ok(DragOverOutcome::Ignored),
            Resolution::SameColumn => {
                session.hover(target);
                Ok(DragOverOutcome::Unchanged)
            }
            Resolution::Moved(status) => {
                session.hover(target);
                debug!(task_id = %dragged, %status, "optimistic column change");
                Ok(DragOverOutcome::Moved(status))
            }
        }
    }

    /// Finishes the drag and commits a cross-column move.
    ///
    /// `final_target` is the element under the pointer at release. When it
    /// is `None` the last hover target of the session is used instead.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] only if internal locks are poisoned. Remote
    /// failures are reported as [`DragOutcome::RolledBack`].
    pub async fn drag_end(&self, final_target: Option<HoverTarget>) -> BoardResult<DragOutcome> {
        let taken = lock(&self.session)?.take();
        let Some(session) = taken else {
            return Ok(DragOutcome::Cancelled);
        };
        let dragged = session.dragged_task_id();
        let origin = session.origin();

        let Some(target) = final_target.or_else(|| session.hover_target()) else {
            debug!(task_id = %dragged, "drag released outside any target");
            self.restore_origin(&session)?;
            return Ok(DragOutcome::Cancelled);
        };

        let reopen = self.config.reopen_progress;
        let clock = &*self.clock;
        let prepared = self.store.write(|store| {
            if store.get(dragged).is_none() {
                return Resolution::DraggedMissing;
            }
            match resolve_target(store, target) {
                None => {
                    store.update_stable(dragged, |task| task.restore(origin));
                    Resolution::TargetMissing
                }
                Some(status) if status == origin.status => {
                    store.update_stable(dragged, |task| task.restore(origin));
                    Resolution::SameColumn
                }
                Some(status) => {
                    store.update_stable(dragged, |task| {
                        project(task, origin, status, reopen, clock);
                    });
                    if store.begin_commit(dragged, origin) {
                        Resolution::Moved(status)
                    } else {
                        Resolution::DraggedMissing
                    }
                }
            }
        })?;

        let status = match prepared {
            Resolution::DraggedMissing | Resolution::TargetMissing => {
                debug!(task_id = %dragged, %target, "drag target unresolved, cancelling");
                return Ok(DragOutcome::Cancelled);
            }
            Resolution::SameColumn => return Ok(DragOutcome::Unchanged),
            Resolution::Moved(status) => status,
        };

        let update = self.gateway.update_status(dragged, status);
        match self.bounded(update).await {
            Ok(confirmed) => {
                let settled = settle(confirmed, origin, reopen);
                let kept = self.store.write(|store| store.confirm(dragged, settled.clone()))?;
                if !kept {
                    debug!(task_id = %dragged, "task left the board before confirmation");
                }
                info!(task_id = %dragged, from = %origin.status, to = %settled.status(), "task moved");
                self.record_activity(ActivityEntry::for_move(self.actor_id, &settled, origin.status));
                Ok(DragOutcome::Committed(settled))
            }
            Err(failure) => {
                self.store.write(|store| store.rollback(dragged))?;
                warn!(task_id = %dragged, error = %failure, "task move failed, rolled back");
                self.notifier
                    .notify(Notification::error(self.config.failure_message.clone(), dragged));
                Ok(DragOutcome::RolledBack {
                    task_id: dragged,
                    failure,
                })
            }
        }
    }

    /// Abandons the active drag, restoring the task's origin placement.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] only if internal locks are poisoned.
    pub fn cancel(&self) -> BoardResult<DragOutcome> {
        lock(&self.gesture)?.cancel();
        let taken = lock(&self.session)?.take();
        if let Some(session) = taken {
            debug!(task_id = %session.dragged_task_id(), "drag cancelled");
            self.restore_origin(&session)?;
        }
        Ok(DragOutcome::Cancelled)
    }

    /// Records a pointer press on a task card.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::StatePoisoned`] if the gesture lock is poisoned.
    pub fn pointer_down(&self, task_id: TaskId, at_point: Point) -> BoardResult<()> {
        lock(&self.gesture)?.press(task_id, at_point, self.clock.utc());
        Ok(())
    }

    /// Feeds a pointer move. Starts the drag once the activation constraint
    /// is met and forwards hover targets while dragging.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] only if internal locks are poisoned.
    pub fn pointer_move(&self, point: Point, hover: Option<HoverTarget>) -> BoardResult<()> {
        let (event, dragging) = {
            let mut gesture = lock(&self.gesture)?;
            let event = gesture.movement(point, self.clock.utc());
            (event, gesture.dragging())
        };
        if let GestureEvent::DragActivated(task_id) = event {
            self.drag_start(task_id)?;
        }
        if let (Some(_), Some(target)) = (dragging, hover) {
            self.drag_over(target)?;
        }
        Ok(())
    }

    /// Releases the pointer, producing exactly one of a click, a drag
    /// outcome, or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] only if internal locks are poisoned.
    pub async fn pointer_up(
        &self,
        point: Point,
        hover: Option<HoverTarget>,
    ) -> BoardResult<GestureOutcome> {
        let release = lock(&self.gesture)?.release(point, self.clock.utc());
        match release {
            GestureRelease::Click(task_id) => Ok(GestureOutcome::OpenDetail(task_id)),
            GestureRelease::DragEnded(task_id) => {
                if !self.is_drag_subject(task_id)? {
                    self.drag_start(task_id)?;
                }
                Ok(GestureOutcome::Drag(self.drag_end(hover).await?))
            }
            GestureRelease::Ignored => Ok(GestureOutcome::Ignored),
        }
    }

    /// Re-reads a task from the gateway and inserts or replaces the local
    /// copy.
    ///
    /// Tasks that are being dragged or have a commit in flight are left
    /// alone. A task the gateway no longer knows is removed from the board.
    /// Returns the refreshed task, or `None` when nothing was replaced.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Gateway`] for gateway failures other than
    /// not-found, or lock errors.
    pub async fn refresh_task(&self, task_id: TaskId) -> BoardResult<Option<Task>> {
        let fetched = match self.gateway.get(task_id).await {
            Ok(task) => Some(task),
            Err(GatewayError::NotFound(_)) => None,
            Err(err) => return Err(err.into()),
        };

        if self.is_drag_subject(task_id)? {
            return Ok(None);
        }
        let refreshed = self.store.write(|store| {
            if store.is_pending(task_id) {
                return None;
            }
            match fetched {
                Some(task) => {
                    store.insert(task.clone());
                    Some(task)
                }
                None => {
                    if store.remove(task_id).is_some() {
                        debug!(%task_id, "task deleted remotely, removed from board");
                    }
                    None
                }
            }
        })?;
        Ok(refreshed)
    }

    /// Writes an explicit order for one column.
    ///
    /// `ordered_ids` receive order indices `0..n`. The new order is shown
    /// immediately and restored if the gateway rejects it. Drag gestures
    /// never call this.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] only if internal locks are poisoned.
    pub async fn persist_column_order(
        &self,
        status: TaskStatus,
        ordered_ids: &[TaskId],
    ) -> BoardResult<ReorderOutcome> {
        let dragged = lock(&self.session)?
            .as_ref()
            .map(DragSession::dragged_task_id);
        let positions: Vec<i64> = (0_i64..).take(ordered_ids.len()).collect();

        let prepared = self.store.write(|store| {
            let unique = ordered_ids.iter().collect::<HashSet<_>>().len() == ordered_ids.len();
            let eligible = unique && ordered_ids.iter().all(|id| {
                Some(*id) != dragged
                    && matches!(store.entry(*id), Some(TaskEntry::Stable(task)) if task.status() == status)
            });
            if !eligible {
                return false;
            }
            for (id, position) in ordered_ids.iter().zip(&positions) {
                let origin = store.get(*id).map(Task::origin_snapshot);
                store.update_stable(*id, |task| task.set_order_index(*position));
                if let Some(origin) = origin {
                    store.begin_commit(*id, origin);
                }
            }
            true
        })?;
        if !prepared {
            debug!(%status, "column order rejected: tasks missing, busy or misplaced");
            return Ok(ReorderOutcome::Ignored);
        }

        let write = self.gateway.reorder(ordered_ids, &positions);
        match self.bounded(write).await {
            Ok(()) => {
                self.store.write(|store| {
                    for id in ordered_ids {
                        if let Some(task) = store.get(*id).cloned() {
                            store.confirm(*id, task);
                        }
                    }
                })?;
                info!(%status, count = ordered_ids.len(), "column order saved");
                Ok(ReorderOutcome::Applied)
            }
            Err(failure) => {
                self.store.write(|store| {
                    for id in ordered_ids {
                        store.rollback(*id);
                    }
                })?;
                warn!(%status, error = %failure, "column order failed, rolled back");
                if let Some(first) = ordered_ids.first() {
                    self.notifier
                        .notify(Notification::error(self.config.failure_message.clone(), *first));
                }
                Ok(ReorderOutcome::RolledBack(failure))
            }
        }
    }

    /// Waits for every audit write spawned so far.
    ///
    /// Writes still outstanding when the controller is dropped are detached
    /// and finish on the runtime unless it shuts down first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::StatePoisoned`] if the activity lock is
    /// poisoned.
    pub async fn drain_activity(&self) -> BoardResult<()> {
        let mut pending = std::mem::take(&mut *lock(&self.activity)?);
        while let Some(joined) = pending.join_next().await {
            if let Err(err) = joined {
                warn!(error = %err, "activity task did not complete");
            }
        }
        Ok(())
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = GatewayResult<T>>,
    ) -> Result<T, CommitFailure> {
        match self.config.commit_timeout() {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result.map_err(CommitFailure::Gateway),
                Err(_) => Err(CommitFailure::TimedOut(limit)),
            },
            None => call.await.map_err(CommitFailure::Gateway),
        }
    }

    fn record_activity(&self, entry: ActivityEntry) {
        let recorder = Arc::clone(&self.recorder);
        let Ok(mut pending) = lock(&self.activity) else {
            warn!(task_id = %entry.task_id, "activity tracker poisoned, skipping audit entry");
            return;
        };
        while pending.try_join_next().is_some() {}
        pending.spawn(async move {
            if let Err(err) = recorder.record(&entry).await {
                warn!(
                    task_id = %entry.task_id,
                    kind = %entry.kind,
                    error = %err,
                    "failed to record task activity"
                );
            }
        });
    }

    fn restore_origin(&self, session: &DragSession) -> BoardResult<()> {
        let origin = session.origin();
        self.store.write(|store| {
            store.update_stable(session.dragged_task_id(), |task| task.restore(origin));
        })?;
        Ok(())
    }
}
