//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{Task, TaskSlug},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    active: BTreeMap<TaskSlug, Task>,
    archived: BTreeMap<TaskSlug, Task>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        let slug = task.id();
        if state.active.contains_key(slug) || state.archived.contains_key(slug) {
            return Err(TaskRepositoryError::DuplicateTask(slug.clone()));
        }
        state.active.insert(slug.clone(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .active
            .get_mut(task.id())
            .ok_or_else(|| TaskRepositoryError::NotFound(task.id().clone()))?;
        *stored = task.clone();
        Ok(())
    }

    async fn archive(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.active.remove(task.id()).is_none() {
            return Err(TaskRepositoryError::NotFound(task.id().clone()));
        }
        state.archived.insert(task.id().clone(), task.clone());
        Ok(())
    }

    async fn find_by_slug(&self, slug: &TaskSlug) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        let task = state
            .active
            .get(slug)
            .or_else(|| state.archived.get(slug))
            .cloned();
        Ok(task)
    }

    async fn list_active(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state.active.values().cloned().collect())
    }

    async fn list_archived(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state.archived.values().cloned().collect())
    }
}
