//! In-memory context bucket repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{ActionBucket, PipelineAction, TaskSlug},
    ports::{ContextRepository, ContextRepositoryError, ContextRepositoryResult},
};

/// Thread-safe in-memory context repository keyed by task and action.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContextRepository {
    buckets: Arc<RwLock<HashMap<(TaskSlug, PipelineAction), ActionBucket>>>,
}

impl InMemoryContextRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> ContextRepositoryError {
    ContextRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ContextRepository for InMemoryContextRepository {
    async fn load_bucket(
        &self,
        task: &TaskSlug,
        action: PipelineAction,
    ) -> ContextRepositoryResult<Option<ActionBucket>> {
        let buckets = self.buckets.read().map_err(lock_error)?;
        Ok(buckets.get(&(task.clone(), action)).cloned())
    }

    async fn save_bucket(
        &self,
        task: &TaskSlug,
        bucket: &ActionBucket,
    ) -> ContextRepositoryResult<()> {
        let mut buckets = self.buckets.write().map_err(lock_error)?;
        buckets.insert((task.clone(), bucket.action()), bucket.clone());
        Ok(())
    }
}
