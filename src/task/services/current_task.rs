//! Service layer for the current-task pointer.

use crate::task::{
    domain::{Task, TaskSlug},
    ports::{CurrentTaskStore, CurrentTaskStoreError, TaskRepository, TaskRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for current-task pointer operations.
#[derive(Debug, Error)]
pub enum CurrentTaskError {
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Pointer storage failed.
    #[error(transparent)]
    Session(#[from] CurrentTaskStoreError),
    /// No task has the slug.
    #[error("task not found: {0}")]
    TaskNotFound(TaskSlug),
    /// Archived tasks cannot become current.
    #[error("task {0} is archived")]
    TaskArchived(TaskSlug),
}

/// Result type for current-task service operations.
pub type CurrentTaskResult<T> = Result<T, CurrentTaskError>;

/// Reads and writes the single current-task pointer of a workflow root.
///
/// Setting the pointer never changes the status of the referenced task.
#[derive(Clone)]
pub struct CurrentTaskService<R, S>
where
    R: TaskRepository,
    S: CurrentTaskStore,
{
    tasks: Arc<R>,
    session: Arc<S>,
}

impl<R, S> CurrentTaskService<R, S>
where
    R: TaskRepository,
    S: CurrentTaskStore,
{
    /// Creates a new current-task service.
    #[must_use]
    pub const fn new(tasks: Arc<R>, session: Arc<S>) -> Self {
        Self { tasks, session }
    }

    /// Returns the current task slug, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CurrentTaskError::Session`] when the pointer cannot be read.
    pub async fn get(&self) -> CurrentTaskResult<Option<TaskSlug>> {
        Ok(self.session.get().await?)
    }

    /// Returns the record of the current task, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CurrentTaskError::TaskNotFound`] when the pointer references
    /// a task that no longer exists.
    pub async fn current_task(&self) -> CurrentTaskResult<Option<Task>> {
        let Some(slug) = self.session.get().await? else {
            return Ok(None);
        };
        let task = self
            .tasks
            .find_by_slug(&slug)
            .await?
            .ok_or(CurrentTaskError::TaskNotFound(slug))?;
        Ok(Some(task))
    }

    /// Points at `slug`.
    ///
    /// # Errors
    ///
    /// Returns [`CurrentTaskError::TaskNotFound`] when the slug is unknown and
    /// [`CurrentTaskError::TaskArchived`] for archived tasks.
    pub async fn set(&self, slug: &TaskSlug) -> CurrentTaskResult<()> {
        let task = self
            .tasks
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| CurrentTaskError::TaskNotFound(slug.clone()))?;
        if task.status().is_terminal() {
            return Err(CurrentTaskError::TaskArchived(slug.clone()));
        }
        self.session.set(slug).await?;
        info!(task = %slug, "set current task");
        Ok(())
    }

    /// Clears the pointer. Clearing an empty pointer succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`CurrentTaskError::Session`] when the pointer cannot be
    /// written.
    pub async fn clear(&self) -> CurrentTaskResult<()> {
        self.session.clear().await?;
        info!("cleared current task");
        Ok(())
    }
}
