//! Application services for task lifecycle and context injection.

mod context;
mod current_task;
mod injection;
mod kind;
mod lifecycle;

pub use context::{
    AddContextEntryRequest, ContextIndexError, ContextIndexResult, ContextIndexService,
};
pub use current_task::{CurrentTaskError, CurrentTaskResult, CurrentTaskService};
pub use injection::{
    ContextInjectionError, ContextInjectionResult, ContextInjectionService, ContextIssue,
    ContextProblem, DocumentState, InjectedDocument, InjectionPayload,
};
pub use kind::WorkflowErrorKind;
pub use lifecycle::{
    CreateTaskRequest, StartTaskRequest, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService,
};
