//! Error types for task domain validation and state transitions.

use super::{TaskSlug, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task slug is empty, malformed, or reserved.
    #[error("invalid task slug '{0}', expected 1-64 characters of [a-z0-9-]")]
    InvalidSlug(String),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The development type value is not recognized.
    #[error("invalid dev type '{0}', expected backend, frontend, fullstack, test, or docs")]
    InvalidDevType(String),

    /// The pipeline action name is not recognized.
    #[error("unknown action '{0}', expected implement, check, debug, finish, or create-pr")]
    UnknownAction(String),

    /// The context entry kind is neither `file` nor `directory`.
    #[error("invalid context entry type '{0}', expected file or directory")]
    InvalidEntryKind(String),

    /// Advancing would move the phase pointer past the declared pipeline.
    #[error(
        "task {task_id} cannot advance past phase index {current_phase} of a {length}-step pipeline"
    )]
    PhaseOutOfRange {
        /// Task whose phase pointer was advanced.
        task_id: TaskSlug,
        /// Phase index at the time of the failed advance.
        current_phase: usize,
        /// Number of steps in the pipeline.
        length: usize,
    },

    /// Completion was requested before every pipeline step was reached.
    #[error("task {task_id} is at phase index {current_phase} of a {length}-step pipeline")]
    IncompletePipeline {
        /// Task that was marked complete.
        task_id: TaskSlug,
        /// Phase index at the time of the failed completion.
        current_phase: usize,
        /// Number of steps in the pipeline.
        length: usize,
    },

    /// The requested status change is not permitted.
    #[error("task {task_id} cannot transition from {from} to {to}")]
    InvalidStateTransition {
        /// Task whose status change was rejected.
        task_id: TaskSlug,
        /// Status before the attempted transition.
        from: TaskStatus,
        /// Requested target status.
        to: TaskStatus,
    },

    /// Phase advancement requires an in-progress task.
    #[error("task {task_id} is {status}, phases advance only while in_progress")]
    NotInProgress {
        /// Task whose phase was advanced.
        task_id: TaskSlug,
        /// Current task status.
        status: TaskStatus,
    },

    /// Pipeline phase numbers decrease between two consecutive steps.
    #[error("pipeline phase {next} follows phase {previous}, phases must not decrease")]
    PipelineOutOfOrder {
        /// Phase number of the earlier step.
        previous: u32,
        /// Phase number of the offending step.
        next: u32,
    },

    /// The pipeline can only be replaced while the task is being planned.
    #[error("task {task_id} is {status}, the pipeline is fixed once planning ends")]
    PipelineLocked {
        /// Task whose pipeline was replaced.
        task_id: TaskSlug,
        /// Current task status.
        status: TaskStatus,
    },

    /// A context entry path is empty after trimming.
    #[error("context entry path must not be empty")]
    EmptyContextPath,

    /// A context entry path is absolute or climbs above the project root.
    #[error("context entry path '{0}' must stay inside the project")]
    ContextPathOutsideProject(String),

    /// A context entry reason is empty after trimming.
    #[error("context entry reason must not be empty")]
    EmptyContextReason,

    /// A task was registered as its own subtask.
    #[error("task {0} cannot be its own subtask")]
    SelfSubtask(TaskSlug),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
