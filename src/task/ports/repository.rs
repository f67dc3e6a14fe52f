//! Repository port for task record persistence and lookup.

use crate::task::domain::{Task, TaskSlug};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Records live in one of two namespaces: active tasks and archived tasks.
/// Lookups by slug search both.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task in the active namespace.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the slug is already
    /// used by an active or archived task.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing active task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when no active task has the
    /// slug.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists `task` and moves it, with its context buckets, into the
    /// archive namespace.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when no active task has the
    /// slug.
    async fn archive(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by slug in either namespace.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_slug(&self, slug: &TaskSlug) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every active task ordered by slug.
    async fn list_active(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns every archived task ordered by slug.
    async fn list_archived(&self) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same slug already exists.
    #[error("duplicate task slug: {0}")]
    DuplicateTask(TaskSlug),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskSlug),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
