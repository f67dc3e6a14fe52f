//! Shared world state for task workflow BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskflow::config::WorkflowConfig;
use taskflow::task::{
    adapters::memory::{InMemoryContextRepository, InMemoryCurrentTaskStore, InMemoryTaskRepository},
    domain::TaskSlug,
    services::{
        ContextIndexService, CurrentTaskService, TaskLifecycleService, WorkflowErrorKind,
    },
};

/// Lifecycle service type used by the BDD world.
pub type TestLifecycle =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryCurrentTaskStore, DefaultClock>;

/// Scenario world for task workflow behaviour tests.
pub struct TaskWorkflowWorld {
    pub lifecycle: TestLifecycle,
    pub context: ContextIndexService<InMemoryTaskRepository, InMemoryContextRepository>,
    pub current: CurrentTaskService<InMemoryTaskRepository, InMemoryCurrentTaskStore>,
    pub last_error: Option<WorkflowErrorKind>,
}

impl TaskWorkflowWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let session = Arc::new(InMemoryCurrentTaskStore::new());

        Self {
            lifecycle: TaskLifecycleService::new(
                Arc::clone(&tasks),
                Arc::clone(&session),
                Arc::new(DefaultClock),
            ),
            context: ContextIndexService::new(
                Arc::clone(&tasks),
                Arc::new(InMemoryContextRepository::new()),
                &WorkflowConfig::default(),
            ),
            current: CurrentTaskService::new(tasks, session),
            last_error: None,
        }
    }
}

impl Default for TaskWorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskWorkflowWorld {
    TaskWorkflowWorld::default()
}

/// Parses a slug written in a feature file.
pub fn parse_slug(value: &str) -> Result<TaskSlug, eyre::Report> {
    TaskSlug::new(value).map_err(|err| eyre::eyre!("invalid slug in scenario: {err}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
