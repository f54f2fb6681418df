//! Column partitioner: derives the three rendered columns from a task store.
//!
//! Partitioning is a pure function of the store and the filter, so the board
//! can be re-derived at any time.

use super::{ActorId, ProjectId, Task, TaskStatus, TaskStore};
use std::collections::HashSet;

/// Optional predicates narrowing which tasks appear on the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardFilter {
    search: Option<String>,
    projects: Option<HashSet<ProjectId>>,
    assignee: Option<ActorId>,
}

impl BoardFilter {
    /// Creates a filter that admits every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps tasks whose title, description or tags contain `text`,
    /// ignoring case. Blank text disables the search.
    #[must_use]
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        let needle = text.into().trim().to_lowercase();
        self.search = if needle.is_empty() { None } else { Some(needle) };
        self
    }

    /// Keeps tasks belonging to one of `projects`.
    #[must_use]
    pub fn with_projects(mut self, projects: impl IntoIterator<Item = ProjectId>) -> Self {
        self.projects = Some(projects.into_iter().collect());
        self
    }

    /// Keeps tasks assigned to `assignee`.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: ActorId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Returns `true` when the task passes every active predicate.
    #[must_use]
    pub fn admits(&self, task: &Task) -> bool {
        let project_ok = self
            .projects
            .as_ref()
            .is_none_or(|projects| projects.contains(&task.project_id()));
        let assignee_ok = self
            .assignee
            .is_none_or(|assignee| task.details().assignee() == Some(assignee));
        let search_ok = self
            .search
            .as_deref()
            .is_none_or(|needle| matches_search(task, needle));
        project_ok && assignee_ok && search_ok
    }
}

fn matches_search(task: &Task, needle: &str) -> bool {
    let details = task.details();
    details.title().to_lowercase().contains(needle)
        || details
            .description()
            .is_some_and(|description| description.to_lowercase().contains(needle))
        || details
            .tags()
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

/// The three ordered columns of a board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardColumns {
    todo: Vec<Task>,
    in_progress: Vec<Task>,
    done: Vec<Task>,
}

impl BoardColumns {
    /// Returns the ordered tasks of one column.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    /// Returns the total number of tasks across all columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    /// Returns `true` when every column is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates `(status, tasks)` pairs in rendering order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, &[Task])> {
        TaskStatus::ALL
            .into_iter()
            .map(move |status| (status, self.column(status)))
    }

    const fn column_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        match status {
            TaskStatus::Todo => &mut self.todo,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Done => &mut self.done,
        }
    }
}

/// Splits the store into status columns sorted by ascending order index.
///
/// Ties keep store insertion order.
///
/// # Examples
///
/// ```
/// use mockable::DefaultClock;
/// use taskboard::board::domain::{
///     partition, BoardFilter, ProjectId, Task, TaskDetails, TaskStatus, TaskStore,
/// };
///
/// let project = ProjectId::new();
/// let a = Task::new(project, TaskDetails::new("A").expect("title"), &DefaultClock)
///     .with_order_index(1);
/// let b = Task::new(project, TaskDetails::new("B").expect("title"), &DefaultClock)
///     .with_order_index(0);
/// let store: TaskStore = [a.clone(), b.clone()].into_iter().collect();
///
/// let columns = partition(&store, &BoardFilter::new());
/// assert_eq!(columns.column(TaskStatus::Todo), &[b, a]);
/// ```
#[must_use]
pub fn partition(store: &TaskStore, filter: &BoardFilter) -> BoardColumns {
    let mut columns = BoardColumns::default();
    for task in store.tasks().filter(|task| filter.admits(task)) {
        columns.column_mut(task.status()).push(task.clone());
    }
    for status in TaskStatus::ALL {
        columns.column_mut(status).sort_by_key(Task::order_index);
    }
    columns
}
