//! Service layer for task creation, status transitions, and phase tracking.

use crate::task::{
    domain::{PhasePipeline, Task, TaskDomainError, TaskLinkage, TaskSlug, TaskStatus},
    ports::{CurrentTaskStore, CurrentTaskStoreError, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    slug: Option<String>,
    description: Option<String>,
    creator: Option<String>,
    assignee: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request whose slug is derived from the title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: None,
            description: None,
            creator: None,
            assignee: None,
        }
    }

    /// Sets an explicit slug instead of deriving one from the title.
    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the creator identity.
    #[must_use]
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Sets the assignee identity.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }
}

/// Request payload for starting work on a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTaskRequest {
    task: TaskSlug,
    force: bool,
}

impl StartTaskRequest {
    /// Creates a request that refuses to displace another active task.
    #[must_use]
    pub const fn new(task: TaskSlug) -> Self {
        Self { task, force: false }
    }

    /// Allows the start to replace a different current task.
    #[must_use]
    pub const fn forced(mut self) -> Self {
        self.force = true;
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or a state-machine guard failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Current-task pointer operation failed.
    #[error(transparent)]
    Session(#[from] CurrentTaskStoreError),
    /// No task has the slug.
    #[error("task not found: {0}")]
    TaskNotFound(TaskSlug),
    /// Another task is current and the start was not forced.
    #[error("task {active} is already active, cannot start {requested} without forcing")]
    AlreadyActive {
        /// Task the caller asked to start.
        requested: TaskSlug,
        /// Task the pointer currently references.
        active: TaskSlug,
    },
    /// The task has been archived and can no longer change.
    #[error("task {0} is archived")]
    TaskArchived(TaskSlug),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, S, C>
where
    R: TaskRepository,
    S: CurrentTaskStore,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    session: Arc<S>,
    clock: Arc<C>,
}

impl<R, S, C> TaskLifecycleService<R, S, C>
where
    R: TaskRepository,
    S: CurrentTaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, session: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            repository,
            session,
            clock,
        }
    }

    /// Creates a task in the planning status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for an invalid slug or title and
    /// [`TaskLifecycleError::Repository`] when the slug is taken.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let slug = match request.slug {
            Some(explicit) => TaskSlug::new(explicit)?,
            None => TaskSlug::from_title(&request.title)?,
        };

        let mut task = Task::new(slug, request.title, &*self.clock)?;
        if let Some(description) = request.description {
            task = task.with_description(description);
        }
        if let Some(creator) = request.creator {
            task = task.with_creator(creator);
        }
        if let Some(assignee) = request.assignee {
            task = task.with_assignee(assignee);
        }

        self.repository.store(&task).await?;
        info!(task = %task.id(), status = %task.status(), "created task");
        Ok(task)
    }

    /// Retrieves a task from either namespace.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the slug is unknown.
    pub async fn get(&self, slug: &TaskSlug) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| TaskLifecycleError::TaskNotFound(slug.clone()))
    }

    /// Lists active tasks, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list(&self, status: Option<TaskStatus>) -> TaskLifecycleResult<Vec<Task>> {
        let tasks = self.repository.list_active().await?;
        Ok(tasks
            .into_iter()
            .filter(|task| status.is_none_or(|wanted| task.status() == wanted))
            .collect())
    }

    /// Lists archived tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_archived(&self) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list_archived().await?)
    }

    /// Replaces the pipeline of a planning task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] with
    /// [`TaskDomainError::PipelineLocked`] once planning has ended.
    pub async fn set_pipeline(
        &self,
        slug: &TaskSlug,
        pipeline: PhasePipeline,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load_mutable(slug).await?;
        task.set_pipeline(pipeline)?;
        self.repository.update(&task).await?;
        debug!(task = %slug, steps = task.next_action().len(), "set task pipeline");
        Ok(task)
    }

    /// Starts work on a task and makes it the current task.
    ///
    /// Starting the task that is already current succeeds without changes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`],
    /// [`TaskLifecycleError::TaskArchived`], [`TaskLifecycleError::Domain`]
    /// when the task has already completed, or
    /// [`TaskLifecycleError::AlreadyActive`] when a different task is current
    /// and the request is not forced. The status is checked before the
    /// pointer. The pointer is unchanged on failure.
    pub async fn start(&self, request: StartTaskRequest) -> TaskLifecycleResult<Task> {
        let mut task = self.load_mutable(&request.task).await?;
        let previous_status = task.status();
        task.start()?;
        let current = self.session.get().await?;
        let is_current = current.as_ref() == Some(task.id());

        if let Some(active) = current.filter(|active| active != task.id()) {
            if !request.force {
                return Err(TaskLifecycleError::AlreadyActive {
                    requested: request.task,
                    active,
                });
            }
            info!(task = %task.id(), replaced = %active, "forcing current task switch");
        }

        if task.status() != previous_status {
            self.repository.update(&task).await?;
        }
        if !is_current {
            self.session.set(task.id()).await?;
        }
        info!(task = %task.id(), status = %task.status(), "started task");
        Ok(task)
    }

    /// Advances the phase pointer of an in-progress task by one step.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] with
    /// [`TaskDomainError::PhaseOutOfRange`] at the last step, leaving the
    /// pointer unchanged.
    pub async fn advance_phase(&self, slug: &TaskSlug) -> TaskLifecycleResult<Task> {
        let mut task = self.load_mutable(slug).await?;
        let phase = task.advance_phase()?;
        self.repository.update(&task).await?;
        info!(
            task = %slug,
            phase,
            action = task.current_step().map(|step| step.action.as_str()),
            "advanced task phase"
        );
        Ok(task)
    }

    /// Ends the working session on a task.
    ///
    /// Clears the current-task pointer when it references `slug`; the task
    /// status is untouched. Returns whether the pointer was cleared.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the slug is unknown.
    pub async fn finish(&self, slug: &TaskSlug) -> TaskLifecycleResult<bool> {
        let task = self.get(slug).await?;
        let cleared = self.clear_pointer_if_current(task.id()).await?;
        info!(task = %slug, cleared, "finished task session");
        Ok(cleared)
    }

    /// Marks an in-progress task completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] with
    /// [`TaskDomainError::IncompletePipeline`] when steps remain; the status
    /// stays `in_progress`.
    pub async fn complete(&self, slug: &TaskSlug) -> TaskLifecycleResult<Task> {
        let mut task = self.load_mutable(slug).await?;
        task.complete(&*self.clock)?;
        self.repository.update(&task).await?;
        info!(task = %slug, status = %task.status(), "completed task");
        Ok(task)
    }

    /// Archives a completed task.
    ///
    /// Moves the record to the archive namespace and clears the current-task
    /// pointer when it references the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] with
    /// [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// completed.
    pub async fn archive(&self, slug: &TaskSlug) -> TaskLifecycleResult<Task> {
        let mut task = self.load_mutable(slug).await?;
        task.archive()?;
        self.repository.archive(&task).await?;
        let cleared = self.clear_pointer_if_current(task.id()).await?;
        info!(task = %slug, cleared_pointer = cleared, "archived task");
        Ok(task)
    }

    /// Overlays branch, worktree, commit, and pull request metadata.
    ///
    /// Fields left unset in `update` keep their stored values.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] or
    /// [`TaskLifecycleError::TaskArchived`].
    pub async fn update_linkage(
        &self,
        slug: &TaskSlug,
        update: TaskLinkage,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load_mutable(slug).await?;
        let merged = task.linkage().clone().merged_with(update);
        task.set_linkage(merged);
        self.repository.update(&task).await?;
        debug!(task = %slug, "updated task linkage");
        Ok(task)
    }

    /// Registers `child` as a subtask of `parent`.
    ///
    /// Completion never cascades between parent and subtasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when either task is
    /// unknown, or [`TaskLifecycleError::Domain`] with
    /// [`TaskDomainError::SelfSubtask`].
    pub async fn add_subtask(
        &self,
        parent: &TaskSlug,
        child: &TaskSlug,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load_mutable(parent).await?;
        self.get(child).await?;
        if task.add_subtask(child.clone())? {
            self.repository.update(&task).await?;
            debug!(task = %parent, subtask = %child, "added subtask");
        }
        Ok(task)
    }

    /// Removes `child` from the subtasks of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] or
    /// [`TaskLifecycleError::TaskArchived`] for the parent.
    pub async fn remove_subtask(
        &self,
        parent: &TaskSlug,
        child: &TaskSlug,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load_mutable(parent).await?;
        if task.remove_subtask(child) {
            self.repository.update(&task).await?;
            debug!(task = %parent, subtask = %child, "removed subtask");
        }
        Ok(task)
    }

    /// Loads a task that must exist and must not be archived.
    async fn load_mutable(&self, slug: &TaskSlug) -> TaskLifecycleResult<Task> {
        let task = self.get(slug).await?;
        if task.status().is_terminal() {
            return Err(TaskLifecycleError::TaskArchived(slug.clone()));
        }
        Ok(task)
    }

    async fn clear_pointer_if_current(&self, slug: &TaskSlug) -> TaskLifecycleResult<bool> {
        let current = self.session.get().await?;
        if current.as_ref() != Some(slug) {
            return Ok(false);
        }
        self.session.clear().await?;
        Ok(true)
    }
}
