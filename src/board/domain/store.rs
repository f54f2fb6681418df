//! Board-scoped task store with per-task optimistic transactions.
//!
//! Each task lives in a [`TaskEntry`] that is either settled or waiting on a
//! remote commit. The store is an owned value; [`SharedTaskStore`] is the
//! handle the controller and renderer share.

use super::{OriginSnapshot, Task, TaskId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Transaction state of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEntry {
    /// No remote write is outstanding.
    Stable(Task),
    /// An optimistic value awaiting remote confirmation.
    Pending {
        /// The optimistic value currently shown.
        task: Task,
        /// Placement restored if the remote write fails.
        rollback_to: OriginSnapshot,
    },
}

impl TaskEntry {
    /// Returns the task as currently shown on the board.
    #[must_use]
    pub const fn task(&self) -> &Task {
        match self {
            Self::Stable(task) | Self::Pending { task, .. } => task,
        }
    }

    /// Returns `true` while a remote write is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// Ordered collection of the tasks on one board.
///
/// Iteration follows insertion order, which is also the tie-break used by the
/// column partitioner.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    order: Vec<TaskId>,
    entries: HashMap<TaskId, TaskEntry>,
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a stable task, replacing any existing entry with the same id in
    /// place. Returns the replaced entry.
    pub fn insert(&mut self, task: Task) -> Option<TaskEntry> {
        let id = task.id();
        let previous = self.entries.insert(id, TaskEntry::Stable(task));
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    /// Removes a task regardless of its transaction state.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let entry = self.entries.remove(&id)?;
        self.order.retain(|existing| *existing != id);
        Some(match entry {
            TaskEntry::Stable(task) | TaskEntry::Pending { task, .. } => task,
        })
    }

    /// Returns the task as currently shown.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.entries.get(&id).map(TaskEntry::task)
    }

    /// Returns the transaction entry for a task.
    #[must_use]
    pub fn entry(&self, id: TaskId) -> Option<&TaskEntry> {
        self.entries.get(&id)
    }

    /// Returns `true` when the task exists and has a remote write outstanding.
    #[must_use]
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.entries.get(&id).is_some_and(TaskEntry::is_pending)
    }

    /// Iterates tasks in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(TaskEntry::task))
    }

    /// Returns the number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` when the store holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Mutates a stable task in place. Pending tasks are left untouched.
    ///
    /// Returns `None` when the task is missing or pending.
    pub fn update_stable<R>(&mut self, id: TaskId, mutate: impl FnOnce(&mut Task) -> R) -> Option<R> {
        match self.entries.get_mut(&id) {
            Some(TaskEntry::Stable(task)) => Some(mutate(task)),
            _ => None,
        }
    }

    /// Marks a stable task as awaiting remote confirmation.
    ///
    /// Returns `false` when the task is missing or already pending.
    pub fn begin_commit(&mut self, id: TaskId, rollback_to: OriginSnapshot) -> bool {
        let Some(TaskEntry::Stable(_)) = self.entries.get(&id) else {
            return false;
        };
        let Some(TaskEntry::Stable(task)) = self.entries.remove(&id) else {
            return false;
        };
        self.entries
            .insert(id, TaskEntry::Pending { task, rollback_to });
        true
    }

    /// Settles a pending task with the remotely confirmed value.
    ///
    /// Returns `false` when the task vanished or was not pending.
    pub fn confirm(&mut self, id: TaskId, confirmed: Task) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry @ TaskEntry::Pending { .. }) => {
                *entry = TaskEntry::Stable(confirmed);
                true
            }
            _ => false,
        }
    }

    /// Settles a pending task back to its rollback placement.
    ///
    /// Returns the restored task, or `None` when the task vanished or was not
    /// pending.
    pub fn rollback(&mut self, id: TaskId) -> Option<Task> {
        let Some(TaskEntry::Pending { .. }) = self.entries.get(&id) else {
            return None;
        };
        let Some(TaskEntry::Pending {
            mut task,
            rollback_to,
        }) = self.entries.remove(&id)
        else {
            return None;
        };
        task.restore(rollback_to);
        self.entries.insert(id, TaskEntry::Stable(task.clone()));
        Some(task)
    }
}

impl FromIterator<Task> for TaskStore {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut store = Self::new();
        for task in iter {
            store.insert(task);
        }
        store
    }
}

/// Error returned when the shared store lock was poisoned by a panic.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("task store lock poisoned: {0}")]
pub struct StoreLockError(String);

/// Cloneable handle to a board's [`TaskStore`].
///
/// Locks are held only for the duration of the closure, never across an
/// await point.
#[derive(Debug, Clone, Default)]
pub struct SharedTaskStore {
    inner: Arc<RwLock<TaskStore>>,
}

impl SharedTaskStore {
    /// Wraps an owned store.
    #[must_use]
    pub fn new(store: TaskStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Runs `inspect` with shared access to the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreLockError`] if the lock was poisoned.
    pub fn read<R>(&self, inspect: impl FnOnce(&TaskStore) -> R) -> Result<R, StoreLockError> {
        let guard: RwLockReadGuard<'_, TaskStore> = self
            .inner
            .read()
            .map_err(|err| StoreLockError(err.to_string()))?;
        Ok(inspect(&guard))
    }

    /// Runs `mutate` with exclusive access to the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreLockError`] if the lock was poisoned.
    pub fn write<R>(&self, mutate: impl FnOnce(&mut TaskStore) -> R) -> Result<R, StoreLockError> {
        let mut guard: RwLockWriteGuard<'_, TaskStore> = self
            .inner
            .write()
            .map_err(|err| StoreLockError(err.to_string()))?;
        Ok(mutate(&mut guard))
    }

    /// Returns a clone of one task as currently shown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreLockError`] if the lock was poisoned.
    pub fn task(&self, id: TaskId) -> Result<Option<Task>, StoreLockError> {
        self.read(|store| store.get(id).cloned())
    }
}

impl From<TaskStore> for SharedTaskStore {
    fn from(store: TaskStore) -> Self {
        Self::new(store)
    }
}
