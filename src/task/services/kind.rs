//! Classification of service errors into workflow-integrity kinds.

use super::{ContextIndexError, ContextInjectionError, CurrentTaskError, TaskLifecycleError};
use crate::task::domain::TaskDomainError;
use std::fmt;

/// Caller-facing error kind. Every kind except [`Self::Other`] is a
/// precondition violation; none is retryable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowErrorKind {
    /// The task slug is unknown.
    TaskNotFound,
    /// Another task is current.
    AlreadyActive,
    /// The phase pointer cannot move past the pipeline.
    PhaseOutOfRange,
    /// Completion was requested before the last step.
    IncompletePipeline,
    /// The action name is not recognized.
    UnknownAction,
    /// The development type is not recognized.
    InvalidDevType,
    /// The task is archived.
    TaskArchived,
    /// Any other validation, state-machine, or storage failure.
    Other,
}

impl WorkflowErrorKind {
    /// Returns the kind name surfaced to users.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskNotFound => "TaskNotFound",
            Self::AlreadyActive => "AlreadyActive",
            Self::PhaseOutOfRange => "PhaseOutOfRange",
            Self::IncompletePipeline => "IncompletePipeline",
            Self::UnknownAction => "UnknownAction",
            Self::InvalidDevType => "InvalidDevType",
            Self::TaskArchived => "TaskArchived",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for WorkflowErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&TaskDomainError> for WorkflowErrorKind {
    fn from(error: &TaskDomainError) -> Self {
        match error {
            TaskDomainError::PhaseOutOfRange { .. } => Self::PhaseOutOfRange,
            TaskDomainError::IncompletePipeline { .. } => Self::IncompletePipeline,
            TaskDomainError::UnknownAction(_) => Self::UnknownAction,
            TaskDomainError::InvalidDevType(_) => Self::InvalidDevType,
            _ => Self::Other,
        }
    }
}

impl TaskLifecycleError {
    /// Classifies this error.
    #[must_use]
    pub fn kind(&self) -> WorkflowErrorKind {
        match self {
            Self::Domain(error) => error.into(),
            Self::TaskNotFound(_) => WorkflowErrorKind::TaskNotFound,
            Self::AlreadyActive { .. } => WorkflowErrorKind::AlreadyActive,
            Self::TaskArchived(_) => WorkflowErrorKind::TaskArchived,
            Self::Repository(_) | Self::Session(_) => WorkflowErrorKind::Other,
        }
    }
}

impl ContextIndexError {
    /// Classifies this error.
    #[must_use]
    pub fn kind(&self) -> WorkflowErrorKind {
        match self {
            Self::Domain(error) => error.into(),
            Self::TaskNotFound(_) => WorkflowErrorKind::TaskNotFound,
            Self::TaskArchived(_) => WorkflowErrorKind::TaskArchived,
            Self::Repository(_) | Self::Context(_) => WorkflowErrorKind::Other,
        }
    }
}

impl CurrentTaskError {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> WorkflowErrorKind {
        match self {
            Self::TaskNotFound(_) => WorkflowErrorKind::TaskNotFound,
            Self::TaskArchived(_) => WorkflowErrorKind::TaskArchived,
            Self::Repository(_) | Self::Session(_) => WorkflowErrorKind::Other,
        }
    }
}

impl ContextInjectionError {
    /// Classifies this error.
    #[must_use]
    pub fn kind(&self) -> WorkflowErrorKind {
        match self {
            Self::Domain(error) => error.into(),
            Self::Context(error) => error.kind(),
            Self::Session(_) | Self::Documents(_) | Self::Render(_) => WorkflowErrorKind::Other,
        }
    }
}
