//! Shared wiring for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskflow::config::WorkflowConfig;
use taskflow::task::{
    adapters::memory::{
        InMemoryContextRepository, InMemoryCurrentTaskStore, InMemoryDocumentSource,
        InMemoryTaskRepository,
    },
    services::{
        ContextIndexService, ContextInjectionService, CurrentTaskService, TaskLifecycleService,
    },
};

/// Lifecycle service over in-memory stores.
pub type Lifecycle =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryCurrentTaskStore, DefaultClock>;

/// Context index service over in-memory stores.
pub type ContextIndex = ContextIndexService<InMemoryTaskRepository, InMemoryContextRepository>;

/// Injection service over in-memory stores.
pub type Injection = ContextInjectionService<
    InMemoryTaskRepository,
    InMemoryContextRepository,
    InMemoryCurrentTaskStore,
    InMemoryDocumentSource,
>;

/// Services sharing one workflow root.
pub struct Workflow {
    pub lifecycle: Lifecycle,
    pub context: ContextIndex,
    pub injection: Injection,
    pub current: CurrentTaskService<InMemoryTaskRepository, InMemoryCurrentTaskStore>,
    pub documents: Arc<InMemoryDocumentSource>,
}

/// Provides a fresh workflow root for each test.
#[fixture]
pub fn workflow() -> Workflow {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let session = Arc::new(InMemoryCurrentTaskStore::new());
    let documents = Arc::new(InMemoryDocumentSource::new());
    let context = ContextIndexService::new(
        Arc::clone(&tasks),
        Arc::new(InMemoryContextRepository::new()),
        &WorkflowConfig::default(),
    );

    Workflow {
        lifecycle: TaskLifecycleService::new(
            Arc::clone(&tasks),
            Arc::clone(&session),
            Arc::new(DefaultClock),
        ),
        injection: ContextInjectionService::new(
            context.clone(),
            Arc::clone(&tasks),
            Arc::clone(&session),
            Arc::clone(&documents),
        ),
        current: CurrentTaskService::new(tasks, session),
        context,
        documents,
    }
}
