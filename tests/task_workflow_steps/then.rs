//! Then steps for task workflow BDD scenarios.

use super::world::{TaskWorkflowWorld, parse_slug, run_async};
use rstest_bdd_macros::then;
use taskflow::task::domain::{PipelineAction, TaskStatus};

#[then(r#"the "{action}" context of task "{slug}" includes "{path}""#)]
fn context_includes(
    world: &TaskWorkflowWorld,
    action: String,
    slug: String,
    path: String,
) -> Result<(), eyre::Report> {
    let parsed = PipelineAction::try_from(action.as_str())
        .map_err(|err| eyre::eyre!("invalid action in scenario: {err}"))?;
    let entries = run_async(world.context.resolve(&parse_slug(&slug)?, parsed))?;

    if !entries.iter().any(|entry| entry.file() == path.as_str()) {
        return Err(eyre::eyre!(
            "expected {path} in the {action} bucket, found {entries:?}"
        ));
    }
    Ok(())
}

#[then(r#"no context entry of task "{slug}" mentions "{fragment}""#)]
fn no_context_mentions(
    world: &TaskWorkflowWorld,
    slug: String,
    fragment: String,
) -> Result<(), eyre::Report> {
    let buckets = run_async(world.context.buckets(&parse_slug(&slug)?))?;
    let offending: Vec<String> = buckets
        .iter()
        .flat_map(|bucket| bucket.entries())
        .map(|entry| entry.file().to_string())
        .filter(|file| file.contains(fragment.as_str()))
        .collect();

    if !offending.is_empty() {
        return Err(eyre::eyre!("unexpected context entries: {offending:?}"));
    }
    Ok(())
}

#[then(r#"the operation fails with error kind "{kind}""#)]
fn operation_fails_with(world: &TaskWorkflowWorld, kind: String) -> Result<(), eyre::Report> {
    match world.last_error {
        Some(found) if found.as_str() == kind => Ok(()),
        Some(found) => Err(eyre::eyre!("expected {kind}, got {found}")),
        None => Err(eyre::eyre!("expected {kind}, but the operation succeeded")),
    }
}

#[then(r#"the current task is "{slug}""#)]
fn current_task_is(world: &TaskWorkflowWorld, slug: String) -> Result<(), eyre::Report> {
    let current = run_async(world.current.get())?;
    if current != Some(parse_slug(&slug)?) {
        return Err(eyre::eyre!("expected current task {slug}, found {current:?}"));
    }
    Ok(())
}

#[then("no task is current")]
fn no_task_is_current(world: &TaskWorkflowWorld) -> Result<(), eyre::Report> {
    let current = run_async(world.current.get())?;
    if let Some(slug) = current {
        return Err(eyre::eyre!("expected no current task, found {slug}"));
    }
    Ok(())
}

#[then(r#"task "{slug}" is at phase {phase:usize}"#)]
fn task_is_at_phase(
    world: &TaskWorkflowWorld,
    slug: String,
    phase: usize,
) -> Result<(), eyre::Report> {
    let task = run_async(world.lifecycle.get(&parse_slug(&slug)?))?;
    if task.current_phase() != phase {
        return Err(eyre::eyre!(
            "expected phase {phase}, found {}",
            task.current_phase()
        ));
    }
    Ok(())
}

#[then(r#"task "{slug}" has status "{status}""#)]
fn task_has_status(
    world: &TaskWorkflowWorld,
    slug: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = run_async(world.lifecycle.get(&parse_slug(&slug)?))?;
    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            task.status()
        ));
    }
    Ok(())
}
