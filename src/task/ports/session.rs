//! Session-state port holding the current-task pointer.
//!
//! The pointer is injected into services instead of living in ambient global
//! state. One store corresponds to one workflow root.

use crate::task::domain::TaskSlug;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for current-task store operations.
pub type CurrentTaskStoreResult<T> = Result<T, CurrentTaskStoreError>;

/// Storage for the single current-task pointer of a workflow root.
#[async_trait]
pub trait CurrentTaskStore: Send + Sync {
    /// Returns the current task slug, if one is set.
    async fn get(&self) -> CurrentTaskStoreResult<Option<TaskSlug>>;

    /// Points at `task`, replacing any previous value.
    async fn set(&self, task: &TaskSlug) -> CurrentTaskStoreResult<()>;

    /// Clears the pointer. Clearing an empty pointer succeeds.
    async fn clear(&self) -> CurrentTaskStoreResult<()>;
}

/// Errors returned by current-task store implementations.
#[derive(Debug, Clone, Error)]
pub enum CurrentTaskStoreError {
    /// The stored pointer does not hold a valid slug.
    #[error("corrupt current-task pointer: {0}")]
    Corrupt(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CurrentTaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
