//! End-to-end task workflow through the in-memory adapters.

use super::helpers::{Workflow, workflow};
use rstest::rstest;
use taskflow::task::{
    domain::{PhasePipeline, PhaseStep, PipelineAction, TaskSlug, TaskStatus},
    services::{CreateTaskRequest, StartTaskRequest, WorkflowErrorKind},
};

fn slug(value: &str) -> TaskSlug {
    TaskSlug::new(value).expect("valid slug")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_moves_from_planning_to_archive(workflow: Workflow) -> eyre::Result<()> {
    workflow
        .documents
        .insert(".taskflow/workflow.md", "Workflow rules")?;
    workflow
        .documents
        .insert(".taskflow/spec/frontend/index.md", "Component rules")?;
    workflow
        .documents
        .insert(".taskflow/spec/frontend/quality-guidelines.md", "Lint the UI")?;

    let task = workflow
        .lifecycle
        .create(CreateTaskRequest::new("Polish settings page"))
        .await?;
    let id = task.id().clone();
    eyre::ensure!(id.as_str() == "polish-settings-page");

    workflow.context.init_defaults(&id, "frontend").await?;
    workflow
        .lifecycle
        .set_pipeline(
            &id,
            PhasePipeline::new(vec![
                PhaseStep::new(1, PipelineAction::Implement),
                PhaseStep::new(2, PipelineAction::Check),
                PhaseStep::new(2, PipelineAction::Debug),
            ])?,
        )
        .await?;
    workflow
        .lifecycle
        .start(StartTaskRequest::new(id.clone()))
        .await?;

    let implement = workflow
        .injection
        .inject("implement")
        .await?
        .ok_or_else(|| eyre::eyre!("expected a payload for the current task"))?;
    eyre::ensure!(implement.documents.len() == 3);
    eyre::ensure!(implement.rendered.contains("Component rules"));

    workflow.lifecycle.advance_phase(&id).await?;
    let check = workflow
        .injection
        .inject("check")
        .await?
        .ok_or_else(|| eyre::eyre!("expected a payload for the current task"))?;
    eyre::ensure!(check.rendered.contains("Lint the UI"));
    eyre::ensure!(check.rendered.contains("Phase: 1"));

    workflow.lifecycle.advance_phase(&id).await?;
    let completed = workflow.lifecycle.complete(&id).await?;
    eyre::ensure!(completed.status() == TaskStatus::Completed);

    let archived = workflow.lifecycle.archive(&id).await?;
    eyre::ensure!(archived.status() == TaskStatus::Archived);
    eyre::ensure!(workflow.current.get().await?.is_none());
    eyre::ensure!(workflow.injection.inject("implement").await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_advance_leaves_phase_unchanged(workflow: Workflow) -> eyre::Result<()> {
    let task = workflow
        .lifecycle
        .create(CreateTaskRequest::new("Single step").with_slug("t1"))
        .await?;
    workflow
        .lifecycle
        .set_pipeline(
            task.id(),
            PhasePipeline::new(vec![PhaseStep::new(1, PipelineAction::Implement)])?,
        )
        .await?;
    workflow
        .lifecycle
        .start(StartTaskRequest::new(slug("t1")))
        .await?;

    let Err(error) = workflow.lifecycle.advance_phase(&slug("t1")).await else {
        eyre::bail!("advancing past a one-step pipeline should fail");
    };
    eyre::ensure!(error.kind() == WorkflowErrorKind::PhaseOutOfRange);

    let stored = workflow.lifecycle.get(&slug("t1")).await?;
    eyre::ensure!(stored.current_phase() == 0);
    eyre::ensure!(stored.status() == TaskStatus::InProgress);
    Ok(())
}
