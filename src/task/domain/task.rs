//! Task aggregate root and related task lifecycle types.

use super::{
    DevType, ParseTaskStatusError, PhasePipeline, PhaseStep, TaskDomainError, TaskLinkage,
    TaskSlug,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created and its pipeline and context are being prepared.
    Planning,
    /// Task work has started.
    InProgress,
    /// Every pipeline step has been reached and the task was marked complete.
    Completed,
    /// Task has been moved to the archive namespace.
    Archived,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    /// Returns whether the lifecycle permits moving from `self` to `target`.
    ///
    /// Statuses advance one step at a time and never move backwards.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Planning, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (Self::Completed, Self::Archived)
        )
    }

    /// Returns `true` for the absorbing archived status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Archived)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "planning" => Ok(Self::Planning),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task aggregate root.
///
/// Serializes to the `task.json` record layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskSlug,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    status: TaskStatus,
    #[serde(default)]
    dev_type: Option<DevType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assignee: Option<String>,
    current_phase: usize,
    next_action: PhasePipeline,
    #[serde(flatten)]
    linkage: TaskLinkage,
    #[serde(default)]
    subtasks: Vec<TaskSlug>,
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
    #[serde(rename = "completedAt", default)]
    completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new task in the planning status with an empty pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        id: TaskSlug,
        title: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw_title = title.into();
        let trimmed = raw_title.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }

        Ok(Self {
            id,
            title: trimmed.to_owned(),
            description: None,
            status: TaskStatus::Planning,
            dev_type: None,
            creator: None,
            assignee: None,
            current_phase: 0,
            next_action: PhasePipeline::default(),
            linkage: TaskLinkage::default(),
            subtasks: Vec::new(),
            created_at: clock.utc(),
            completed_at: None,
        })
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

    /// Returns the task slug.
    #[must_use]
    pub const fn id(&self) -> &TaskSlug {
        &self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the development type, if one has been declared.
    #[must_use]
    pub const fn dev_type(&self) -> Option<DevType> {
        self.dev_type
    }

    /// Returns the creator identity, if any.
    #[must_use]
    pub fn creator(&self) -> Option<&str> {
        self.creator.as_deref()
    }

    /// Returns the assignee identity, if any.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// Returns the zero-based index of the current pipeline step.
    #[must_use]
    pub const fn current_phase(&self) -> usize {
        self.current_phase
    }

    /// Returns the pipeline.
    #[must_use]
    pub const fn next_action(&self) -> &PhasePipeline {
        &self.next_action
    }

    /// Returns the step the phase pointer currently designates, if any.
    #[must_use]
    pub fn current_step(&self) -> Option<&PhaseStep> {
        self.next_action.get(self.current_phase)
    }

    /// Returns branch, worktree, commit, and pull request metadata.
    #[must_use]
    pub const fn linkage(&self) -> &TaskLinkage {
        &self.linkage
    }

    /// Returns the subtask slugs in insertion order.
    #[must_use]
    pub fn subtasks(&self) -> &[TaskSlug] {
        &self.subtasks
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion timestamp, if the task has completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Records the development type chosen when seeding context.
    pub fn set_dev_type(&mut self, dev_type: DevType) {
        self.dev_type = Some(dev_type);
    }

    /// Replaces the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::PipelineLocked`] unless the task is still
    /// being planned.
    pub fn set_pipeline(&mut self, pipeline: PhasePipeline) -> Result<(), TaskDomainError> {
        if self.status != TaskStatus::Planning {
            return Err(TaskDomainError::PipelineLocked {
                task_id: self.id.clone(),
                status: self.status,
            });
        }
        self.next_action = pipeline;
        self.current_phase = 0;
        Ok(())
    }

    /// Replaces branch, worktree, commit, and pull request metadata.
    pub fn set_linkage(&mut self, linkage: TaskLinkage) {
        self.linkage = linkage;
    }

    /// Registers `child` as a subtask. Returns `false` when already present.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::SelfSubtask`] when `child` is this task.
    pub fn add_subtask(&mut self, child: TaskSlug) -> Result<bool, TaskDomainError> {
        if child == self.id {
            return Err(TaskDomainError::SelfSubtask(child));
        }
        if self.subtasks.contains(&child) {
            return Ok(false);
        }
        self.subtasks.push(child);
        Ok(true)
    }

    /// Removes `child` from the subtasks. Returns `false` when absent.
    pub fn remove_subtask(&mut self, child: &TaskSlug) -> bool {
        let before = self.subtasks.len();
        self.subtasks.retain(|existing| existing != child);
        self.subtasks.len() != before
    }

    /// Moves a planning task into progress.
    ///
    /// Starting a task that is already in progress is accepted so a finished
    /// session can be resumed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] for completed or
    /// archived tasks.
    pub fn start(&mut self) -> Result<(), TaskDomainError> {
        if self.status == TaskStatus::InProgress {
            return Ok(());
        }
        self.transition_to(TaskStatus::InProgress)
    }

    /// Moves the phase pointer to the next pipeline step.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotInProgress`] unless the task is in
    /// progress, or [`TaskDomainError::PhaseOutOfRange`] when the pointer is
    /// already at the last step (or the pipeline is empty). The pointer is
    /// unchanged on failure.
    pub fn advance_phase(&mut self) -> Result<usize, TaskDomainError> {
        if self.status != TaskStatus::InProgress {
            return Err(TaskDomainError::NotInProgress {
                task_id: self.id.clone(),
                status: self.status,
            });
        }
        let next = self.current_phase.saturating_add(1);
        if next >= self.next_action.len() {
            return Err(TaskDomainError::PhaseOutOfRange {
                task_id: self.id.clone(),
                current_phase: self.current_phase,
                length: self.next_action.len(),
            });
        }
        self.current_phase = next;
        Ok(next)
    }

    /// Marks the task completed and stamps `completed_at`.
    ///
    /// An empty pipeline has nothing left to traverse and may complete
    /// directly.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// in progress, or [`TaskDomainError::IncompletePipeline`] when the phase
    /// pointer has not reached the last step.
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::Completed)?;
        let length = self.next_action.len();
        let is_final_step = length == 0 || self.current_phase.saturating_add(1) == length;
        if !is_final_step {
            return Err(TaskDomainError::IncompletePipeline {
                task_id: self.id.clone(),
                current_phase: self.current_phase,
                length,
            });
        }
        self.status = TaskStatus::Completed;
        self.completed_at = Some(clock.utc());
        Ok(())
    }

    /// Marks a completed task archived.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// completed.
    pub fn archive(&mut self) -> Result<(), TaskDomainError> {
        self.transition_to(TaskStatus::Archived)
    }

    fn transition_to(&mut self, target: TaskStatus) -> Result<(), TaskDomainError> {
        self.ensure_transition(target)?;
        self.status = target;
        Ok(())
    }

    fn ensure_transition(&self, target: TaskStatus) -> Result<(), TaskDomainError> {
        if self.status.can_transition_to(target) {
            return Ok(());
        }
        Err(TaskDomainError::InvalidStateTransition {
            task_id: self.id.clone(),
            from: self.status,
            to: target,
        })
    }
}
