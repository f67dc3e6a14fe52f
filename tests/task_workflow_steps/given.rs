//! Given steps for task workflow BDD scenarios.

use super::world::{TaskWorkflowWorld, parse_slug, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskflow::task::{
    domain::{PhasePipeline, PhaseStep, PipelineAction},
    services::{CreateTaskRequest, StartTaskRequest},
};

#[given(r#"a task "{slug}" titled "{title}""#)]
fn task_exists(world: &mut TaskWorkflowWorld, slug: String, title: String) -> Result<(), eyre::Report> {
    run_async(
        world
            .lifecycle
            .create(CreateTaskRequest::new(title).with_slug(slug)),
    )
    .wrap_err("create task for scenario")?;
    Ok(())
}

#[given(r#"task "{slug}" has a pipeline of "{actions}""#)]
fn task_has_pipeline(
    world: &mut TaskWorkflowWorld,
    slug: String,
    actions: String,
) -> Result<(), eyre::Report> {
    let steps = actions
        .split(',')
        .zip(1_u32..)
        .map(|(name, phase)| {
            PipelineAction::try_from(name)
                .map(|action| PhaseStep::new(phase, action))
                .map_err(|err| eyre::eyre!("invalid action in scenario: {err}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let pipeline = PhasePipeline::new(steps).wrap_err("build scenario pipeline")?;
    run_async(world.lifecycle.set_pipeline(&parse_slug(&slug)?, pipeline))
        .wrap_err("set pipeline in scenario setup")?;
    Ok(())
}

#[given(r#"task "{slug}" has been started"#)]
fn task_has_been_started(world: &mut TaskWorkflowWorld, slug: String) -> Result<(), eyre::Report> {
    run_async(
        world
            .lifecycle
            .start(StartTaskRequest::new(parse_slug(&slug)?)),
    )
    .wrap_err("start task in scenario setup")?;
    Ok(())
}

#[given(r#"task "{slug}" has advanced one phase"#)]
fn task_has_advanced(world: &mut TaskWorkflowWorld, slug: String) -> Result<(), eyre::Report> {
    run_async(world.lifecycle.advance_phase(&parse_slug(&slug)?))
        .wrap_err("advance phase in scenario setup")?;
    Ok(())
}

#[given(r#"task "{slug}" has been completed"#)]
fn task_has_been_completed(
    world: &mut TaskWorkflowWorld,
    slug: String,
) -> Result<(), eyre::Report> {
    run_async(world.lifecycle.complete(&parse_slug(&slug)?))
        .wrap_err("complete task in scenario setup")?;
    Ok(())
}
