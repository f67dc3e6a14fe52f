//! When steps for task workflow BDD scenarios.

use super::world::{TaskWorkflowWorld, parse_slug, run_async};
use rstest_bdd_macros::when;
use taskflow::task::services::StartTaskRequest;

#[when(r#"default context is initialized for task "{slug}" as "{dev_type}""#)]
fn init_default_context(
    world: &mut TaskWorkflowWorld,
    slug: String,
    dev_type: String,
) -> Result<(), eyre::Report> {
    let id = parse_slug(&slug)?;
    let result = run_async(world.context.init_defaults(&id, &dev_type));
    world.last_error = result.err().map(|err| err.kind());
    Ok(())
}

#[when(r#"task "{slug}" is started"#)]
fn start_task(world: &mut TaskWorkflowWorld, slug: String) -> Result<(), eyre::Report> {
    let id = parse_slug(&slug)?;
    let result = run_async(world.lifecycle.start(StartTaskRequest::new(id)));
    world.last_error = result.err().map(|err| err.kind());
    Ok(())
}

#[when(r#"task "{slug}" advances its phase"#)]
fn advance_task(world: &mut TaskWorkflowWorld, slug: String) -> Result<(), eyre::Report> {
    let id = parse_slug(&slug)?;
    let result = run_async(world.lifecycle.advance_phase(&id));
    world.last_error = result.err().map(|err| err.kind());
    Ok(())
}

#[when(r#"task "{slug}" is archived"#)]
fn archive_task(world: &mut TaskWorkflowWorld, slug: String) -> Result<(), eyre::Report> {
    let id = parse_slug(&slug)?;
    let result = run_async(world.lifecycle.archive(&id));
    world.last_error = result.err().map(|err| err.kind());
    Ok(())
}
