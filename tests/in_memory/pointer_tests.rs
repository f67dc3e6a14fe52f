//! Current-task pointer rules across the lifecycle and pointer services.

use super::helpers::{Workflow, workflow};
use rstest::rstest;
use taskflow::task::{
    domain::{TaskSlug, TaskStatus},
    services::{CreateTaskRequest, StartTaskRequest, WorkflowErrorKind},
};

fn slug(value: &str) -> TaskSlug {
    TaskSlug::new(value).expect("valid slug")
}

async fn create(workflow: &Workflow, id: &str) -> eyre::Result<()> {
    workflow
        .lifecycle
        .create(CreateTaskRequest::new(format!("Task {id}")).with_slug(id))
        .await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_start_keeps_first_task_current(workflow: Workflow) -> eyre::Result<()> {
    create(&workflow, "t1").await?;
    create(&workflow, "t2").await?;
    workflow
        .lifecycle
        .start(StartTaskRequest::new(slug("t1")))
        .await?;

    let Err(error) = workflow
        .lifecycle
        .start(StartTaskRequest::new(slug("t2")))
        .await
    else {
        eyre::bail!("starting a second task should be refused");
    };

    eyre::ensure!(error.kind() == WorkflowErrorKind::AlreadyActive);
    eyre::ensure!(workflow.current.get().await? == Some(slug("t1")));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manual_pointer_switch_keeps_statuses(workflow: Workflow) -> eyre::Result<()> {
    create(&workflow, "t1").await?;
    create(&workflow, "t2").await?;
    workflow
        .lifecycle
        .start(StartTaskRequest::new(slug("t1")))
        .await?;

    workflow.current.set(&slug("t2")).await?;

    let current = workflow
        .current
        .current_task()
        .await?
        .ok_or_else(|| eyre::eyre!("expected a current task"))?;
    eyre::ensure!(current.id() == &slug("t2"));
    eyre::ensure!(current.status() == TaskStatus::Planning);
    let first = workflow.lifecycle.get(&slug("t1")).await?;
    eyre::ensure!(first.status() == TaskStatus::InProgress);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn finishing_a_task_allows_starting_another(workflow: Workflow) -> eyre::Result<()> {
    create(&workflow, "t1").await?;
    create(&workflow, "t2").await?;
    workflow
        .lifecycle
        .start(StartTaskRequest::new(slug("t1")))
        .await?;

    eyre::ensure!(workflow.lifecycle.finish(&slug("t1")).await?);
    workflow
        .lifecycle
        .start(StartTaskRequest::new(slug("t2")))
        .await?;

    eyre::ensure!(workflow.current.get().await? == Some(slug("t2")));
    Ok(())
}
