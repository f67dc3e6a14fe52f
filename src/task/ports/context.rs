//! Repository port for per-task context buckets.

use crate::task::domain::{ActionBucket, PipelineAction, TaskSlug};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for context repository operations.
pub type ContextRepositoryResult<T> = Result<T, ContextRepositoryError>;

/// Context bucket persistence contract.
///
/// Buckets are stored verbatim; deduplication is the caller's concern.
#[async_trait]
pub trait ContextRepository: Send + Sync {
    /// Loads the bucket for `action`, or `None` when it was never written.
    async fn load_bucket(
        &self,
        task: &TaskSlug,
        action: PipelineAction,
    ) -> ContextRepositoryResult<Option<ActionBucket>>;

    /// Replaces the stored bucket for `bucket.action()`.
    async fn save_bucket(&self, task: &TaskSlug, bucket: &ActionBucket)
    -> ContextRepositoryResult<()>;
}

/// Errors returned by context repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ContextRepositoryError {
    /// The task has no context storage.
    #[error("no context storage for task: {0}")]
    NotFound(TaskSlug),

    /// A stored entry could not be decoded.
    #[error("corrupt {action} bucket for task {task}: {reason}")]
    Corrupt {
        /// Task owning the bucket.
        task: TaskSlug,
        /// Action of the bucket.
        action: PipelineAction,
        /// Decoder message.
        reason: String,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ContextRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
