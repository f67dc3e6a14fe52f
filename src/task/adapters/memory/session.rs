//! In-memory current-task pointer.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::TaskSlug,
    ports::{CurrentTaskStore, CurrentTaskStoreError, CurrentTaskStoreResult},
};

/// Thread-safe in-memory current-task pointer.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCurrentTaskStore {
    current: Arc<RwLock<Option<TaskSlug>>>,
}

impl InMemoryCurrentTaskStore {
    /// Creates an empty pointer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> CurrentTaskStoreError {
    CurrentTaskStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl CurrentTaskStore for InMemoryCurrentTaskStore {
    async fn get(&self) -> CurrentTaskStoreResult<Option<TaskSlug>> {
        let current = self.current.read().map_err(lock_error)?;
        Ok(current.clone())
    }

    async fn set(&self, task: &TaskSlug) -> CurrentTaskStoreResult<()> {
        let mut current = self.current.write().map_err(lock_error)?;
        *current = Some(task.clone());
        Ok(())
    }

    async fn clear(&self) -> CurrentTaskStoreResult<()> {
        let mut current = self.current.write().map_err(lock_error)?;
        *current = None;
        Ok(())
    }
}
