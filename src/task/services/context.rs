//! Service layer for per-task context buckets.

use crate::config::WorkflowConfig;
use crate::task::{
    domain::{
        ActionBucket, ContextEntry, DefaultContext, DevType, EntryKind, PipelineAction, Task,
        TaskDomainError, TaskSlug, UpsertOutcome,
    },
    ports::{ContextRepository, ContextRepositoryError, TaskRepository, TaskRepositoryError},
};
use camino::Utf8PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for adding one context entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddContextEntryRequest {
    task: TaskSlug,
    action: String,
    path: String,
    reason: String,
    kind: Option<String>,
}

impl AddContextEntryRequest {
    /// Creates a request for an untyped entry.
    #[must_use]
    pub fn new(
        task: TaskSlug,
        action: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            task,
            action: action.into(),
            path: path.into(),
            reason: reason.into(),
            kind: None,
        }
    }

    /// Declares the entry kind (`file` or `directory`).
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// Service-level errors for context index operations.
#[derive(Debug, Error)]
pub enum ContextIndexError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Context repository operation failed.
    #[error(transparent)]
    Context(#[from] ContextRepositoryError),
    /// No task has the slug.
    #[error("task not found: {0}")]
    TaskNotFound(TaskSlug),
    /// The task has been archived; its context is frozen.
    #[error("task {0} is archived")]
    TaskArchived(TaskSlug),
}

/// Result type for context index service operations.
pub type ContextIndexResult<T> = Result<T, ContextIndexError>;

/// Context index orchestration service.
#[derive(Clone)]
pub struct ContextIndexService<R, X>
where
    R: TaskRepository,
    X: ContextRepository,
{
    tasks: Arc<R>,
    contexts: Arc<X>,
    workflow_root: Utf8PathBuf,
    spec_root: Utf8PathBuf,
}

impl<R, X> ContextIndexService<R, X>
where
    R: TaskRepository,
    X: ContextRepository,
{
    /// Creates a context index service seeding defaults from `config`.
    #[must_use]
    pub fn new(tasks: Arc<R>, contexts: Arc<X>, config: &WorkflowConfig) -> Self {
        Self {
            tasks,
            contexts,
            workflow_root: config.root.clone(),
            spec_root: config.spec_root(),
        }
    }

    /// Seeds the `implement` and `check` buckets with the baseline context
    /// for `dev_type` and records the development type on the task.
    ///
    /// Repeated calls leave the buckets unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ContextIndexError::Domain`] with
    /// [`TaskDomainError::InvalidDevType`] for unrecognized development types,
    /// [`ContextIndexError::TaskNotFound`], or
    /// [`ContextIndexError::TaskArchived`].
    pub async fn init_defaults(
        &self,
        slug: &TaskSlug,
        dev_type: &str,
    ) -> ContextIndexResult<Vec<ActionBucket>> {
        let parsed = DevType::try_from(dev_type)?;
        let mut task = self.load_open_task(slug).await?;
        let defaults = DefaultContext::for_dev_type(parsed, &self.workflow_root, &self.spec_root)?;

        let mut seeded = Vec::new();
        for (action, entries) in defaults.into_buckets() {
            let mut bucket = self.bucket_or_empty(slug, action).await?;
            let mut changed = false;
            for entry in entries {
                changed |= bucket.upsert(entry) != UpsertOutcome::Unchanged;
            }
            if changed {
                self.contexts.save_bucket(slug, &bucket).await?;
            }
            seeded.push(bucket);
        }

        if task.dev_type() != Some(parsed) {
            task.set_dev_type(parsed);
            self.tasks.update(&task).await?;
        }
        info!(task = %slug, dev_type = %parsed, "initialized default context");
        Ok(seeded)
    }

    /// Adds an entry to a bucket, or replaces the reason of the entry that
    /// already has the same path while keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`ContextIndexError::Domain`] with
    /// [`TaskDomainError::UnknownAction`] for unrecognized actions and
    /// [`TaskDomainError::ContextPathOutsideProject`] for absolute or
    /// parent-escaping paths. Also returns [`ContextIndexError::TaskNotFound`] or
    /// [`ContextIndexError::TaskArchived`].
    pub async fn add_entry(
        &self,
        request: AddContextEntryRequest,
    ) -> ContextIndexResult<ActionBucket> {
        let action = PipelineAction::try_from(request.action.as_str())?;
        let mut entry = ContextEntry::new(request.path, request.reason)?;
        if let Some(kind) = request.kind {
            entry = entry.with_kind(EntryKind::try_from(kind.as_str())?);
        }
        self.load_open_task(&request.task).await?;

        let mut bucket = self.bucket_or_empty(&request.task, action).await?;
        let path = entry.file().to_owned();
        let outcome = bucket.upsert(entry);
        if outcome != UpsertOutcome::Unchanged {
            self.contexts.save_bucket(&request.task, &bucket).await?;
        }
        debug!(task = %request.task, %action, %path, ?outcome, "upserted context entry");
        Ok(bucket)
    }

    /// Returns the ordered entries for `action`; an empty list when the
    /// bucket was never written.
    ///
    /// # Errors
    ///
    /// Returns [`ContextIndexError::TaskNotFound`] or
    /// [`ContextIndexError::TaskArchived`].
    pub async fn resolve(
        &self,
        slug: &TaskSlug,
        action: PipelineAction,
    ) -> ContextIndexResult<Vec<ContextEntry>> {
        self.load_open_task(slug).await?;
        let entries = self
            .contexts
            .load_bucket(slug, action)
            .await?
            .map(ActionBucket::into_entries)
            .unwrap_or_default();
        debug!(task = %slug, %action, entries = entries.len(), "resolved context");
        Ok(entries)
    }

    /// Returns every non-empty bucket of the task in pipeline-action order.
    ///
    /// # Errors
    ///
    /// Returns [`ContextIndexError::TaskNotFound`] or
    /// [`ContextIndexError::TaskArchived`].
    pub async fn buckets(&self, slug: &TaskSlug) -> ContextIndexResult<Vec<ActionBucket>> {
        self.load_open_task(slug).await?;
        let mut buckets = Vec::new();
        for action in PipelineAction::ALL {
            let stored = self.contexts.load_bucket(slug, action).await?;
            buckets.extend(stored.filter(|bucket| !bucket.is_empty()));
        }
        Ok(buckets)
    }

    async fn bucket_or_empty(
        &self,
        slug: &TaskSlug,
        action: PipelineAction,
    ) -> ContextIndexResult<ActionBucket> {
        Ok(self
            .contexts
            .load_bucket(slug, action)
            .await?
            .unwrap_or_else(|| ActionBucket::new(action)))
    }

    /// Loads a task that must exist and must not be archived.
    async fn load_open_task(&self, slug: &TaskSlug) -> ContextIndexResult<Task> {
        let task = self
            .tasks
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| ContextIndexError::TaskNotFound(slug.clone()))?;
        if task.status().is_terminal() {
            return Err(ContextIndexError::TaskArchived(slug.clone()));
        }
        Ok(task)
    }
}
