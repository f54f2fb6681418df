//! In-memory task gateway for tests and offline boards.

use async_trait::async_trait;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::board::{
    domain::{ReopenProgress, Task, TaskId, TaskStatus},
    ports::{GatewayError, GatewayResult, TaskGateway},
};

/// Thread-safe in-memory gateway with failure and latency injection.
#[derive(Debug, Clone)]
pub struct InMemoryTaskGateway<C: Clock + Send + Sync> {
    state: Arc<RwLock<GatewayState>>,
    clock: C,
}

#[derive(Debug, Default)]
struct GatewayState {
    tasks: HashMap<TaskId, Task>,
    failure: Option<GatewayError>,
    latency: Option<Duration>,
    status_updates: Vec<(TaskId, TaskStatus)>,
    reorders: Vec<Vec<(TaskId, i64)>>,
}

fn poisoned(err: &impl ToString) -> GatewayError {
    GatewayError::transport(std::io::Error::other(err.to_string()))
}

impl<C: Clock + Send + Sync> InMemoryTaskGateway<C> {
    /// Creates an empty gateway.
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            state: Arc::new(RwLock::new(GatewayState::default())),
            clock,
        }
    }

    /// Stores tasks as their remote copies.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] if the internal lock is poisoned.
    pub fn seed(&self, tasks: impl IntoIterator<Item = Task>) -> GatewayResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        for task in tasks {
            state.tasks.insert(task.id(), task);
        }
        Ok(())
    }

    /// Makes every subsequent call fail with `failure`, or succeed again when
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] if the internal lock is poisoned.
    pub fn set_failure(&self, failure: Option<GatewayError>) -> GatewayResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        state.failure = failure;
        Ok(())
    }

    /// Delays every subsequent call by `latency`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] if the internal lock is poisoned.
    pub fn set_latency(&self, latency: Option<Duration>) -> GatewayResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        state.latency = latency;
        Ok(())
    }

    /// Returns every status update received, in call order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] if the internal lock is poisoned.
    pub fn status_updates(&self) -> GatewayResult<Vec<(TaskId, TaskStatus)>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(state.status_updates.clone())
    }

    /// Returns every reorder batch received, in call order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] if the internal lock is poisoned.
    pub fn reorders(&self) -> GatewayResult<Vec<Vec<(TaskId, i64)>>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(state.reorders.clone())
    }

    async fn simulate_latency(&self) -> GatewayResult<()> {
        let latency = self.state.read().map_err(|err| poisoned(&err))?.latency;
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> TaskGateway for InMemoryTaskGateway<C> {
    async fn update_status(&self, task_id: TaskId, status: TaskStatus) -> GatewayResult<Task> {
        self.simulate_latency().await?;
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        state.status_updates.push((task_id, status));
        if let Some(failure) = state.failure.clone() {
            return Err(failure);
        }

        let task = state
            .tasks
            .get_mut(&task_id)
            .ok_or(GatewayError::NotFound(task_id))?;
        task.move_to(status, ReopenProgress::Keep, &self.clock);
        Ok(task.clone())
    }

    async fn reorder(&self, task_ids: &[TaskId], positions: &[i64]) -> GatewayResult<()> {
        if task_ids.len() != positions.len() {
            return Err(GatewayError::Rejected(format!(
                "{} task ids but {} positions",
                task_ids.len(),
                positions.len()
            )));
        }

        self.simulate_latency().await?;
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        state
            .reorders
            .push(task_ids.iter().copied().zip(positions.iter().copied()).collect());
        if let Some(failure) = state.failure.clone() {
            return Err(failure);
        }

        if let Some(missing) = task_ids.iter().find(|id| !state.tasks.contains_key(id)) {
            return Err(GatewayError::NotFound(*missing));
        }
        for (task_id, position) in task_ids.iter().zip(positions) {
            if let Some(task) = state.tasks.get_mut(task_id) {
                task.set_order_index(*position);
            }
        }
        Ok(())
    }

    async fn get(&self, task_id: TaskId) -> GatewayResult<Task> {
        self.simulate_latency().await?;
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        if let Some(failure) = state.failure.clone() {
            return Err(failure);
        }
        state
            .tasks
            .get(&task_id)
            .cloned()
            .ok_or(GatewayError::NotFound(task_id))
    }
}
