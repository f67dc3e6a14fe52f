//! Shared in-memory service wiring for unit tests.

use std::sync::Arc;

use crate::config::WorkflowConfig;
use crate::task::{
    adapters::memory::{
        InMemoryContextRepository, InMemoryCurrentTaskStore, InMemoryDocumentSource,
        InMemoryTaskRepository,
    },
    domain::{PhasePipeline, PhaseStep, PipelineAction, Task, TaskSlug},
    services::{
        ContextIndexService, ContextInjectionService, CreateTaskRequest, CurrentTaskService,
        StartTaskRequest, TaskLifecycleService,
    },
};
use mockable::DefaultClock;

pub(super) type Lifecycle =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryCurrentTaskStore, DefaultClock>;
pub(super) type ContextIndex = ContextIndexService<InMemoryTaskRepository, InMemoryContextRepository>;
pub(super) type Injection = ContextInjectionService<
    InMemoryTaskRepository,
    InMemoryContextRepository,
    InMemoryCurrentTaskStore,
    InMemoryDocumentSource,
>;
pub(super) type CurrentTask = CurrentTaskService<InMemoryTaskRepository, InMemoryCurrentTaskStore>;

/// Services sharing one set of in-memory stores.
pub(super) struct Harness {
    pub(super) lifecycle: Lifecycle,
    pub(super) context: ContextIndex,
    pub(super) current: CurrentTask,
    pub(super) injection: Injection,
    pub(super) session: Arc<InMemoryCurrentTaskStore>,
    pub(super) documents: Arc<InMemoryDocumentSource>,
}

impl Harness {
    pub(super) fn new() -> Self {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let contexts = Arc::new(InMemoryContextRepository::new());
        let session = Arc::new(InMemoryCurrentTaskStore::new());
        let documents = Arc::new(InMemoryDocumentSource::new());
        let config = WorkflowConfig::default();

        let context = ContextIndexService::new(Arc::clone(&tasks), contexts, &config);
        Self {
            lifecycle: TaskLifecycleService::new(
                Arc::clone(&tasks),
                Arc::clone(&session),
                Arc::new(DefaultClock),
            ),
            current: CurrentTaskService::new(Arc::clone(&tasks), Arc::clone(&session)),
            injection: ContextInjectionService::new(
                context.clone(),
                tasks,
                Arc::clone(&session),
                Arc::clone(&documents),
            ),
            context,
            session,
            documents,
        }
    }

    pub(super) async fn create(&self, slug: &str) -> Task {
        self.lifecycle
            .create(CreateTaskRequest::new(format!("Task {slug}")).with_slug(slug))
            .await
            .expect("task creation should succeed")
    }

    /// Creates a task with a two-step implement/check pipeline and starts it.
    pub(super) async fn create_started(&self, slug: &str) -> Task {
        let task = self.create(slug).await;
        self.lifecycle
            .set_pipeline(task.id(), two_step_pipeline())
            .await
            .expect("pipeline should be accepted");
        self.lifecycle
            .start(StartTaskRequest::new(task.id().clone()))
            .await
            .expect("start should succeed")
    }
}

pub(super) fn slug(value: &str) -> TaskSlug {
    TaskSlug::new(value).expect("valid slug")
}

pub(super) fn two_step_pipeline() -> PhasePipeline {
    PhasePipeline::new(vec![
        PhaseStep::new(1, PipelineAction::Implement),
        PhaseStep::new(2, PipelineAction::Check),
    ])
    .expect("valid pipeline")
}
