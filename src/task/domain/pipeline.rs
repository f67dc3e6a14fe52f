//! Phase pipeline value objects.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Agent action executed by one pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineAction {
    /// Write the change.
    Implement,
    /// Review the change against the project specs.
    Check,
    /// Diagnose failures found by a check.
    Debug,
    /// Wrap up the session and record the outcome.
    Finish,
    /// Open a pull request for the change.
    CreatePr,
}

impl PipelineAction {
    /// Every action in canonical pipeline order.
    pub const ALL: [Self; 5] = [
        Self::Implement,
        Self::Check,
        Self::Debug,
        Self::Finish,
        Self::CreatePr,
    ];

    /// Returns the canonical action name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Implement => "implement",
            Self::Check => "check",
            Self::Debug => "debug",
            Self::Finish => "finish",
            Self::CreatePr => "create-pr",
        }
    }
}

impl TryFrom<&str> for PipelineAction {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "implement" => Ok(Self::Implement),
            "check" => Ok(Self::Check),
            "debug" => Ok(Self::Debug),
            "finish" => Ok(Self::Finish),
            "create-pr" => Ok(Self::CreatePr),
            _ => Err(TaskDomainError::UnknownAction(value.to_owned())),
        }
    }
}

impl fmt::Display for PipelineAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `{phase, action}` step of a task pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhaseStep {
    /// Caller-assigned phase number; steps sharing a number run in parallel.
    pub phase: u32,
    /// Action performed in this step.
    pub action: PipelineAction,
}

impl PhaseStep {
    /// Creates a pipeline step.
    #[must_use]
    pub const fn new(phase: u32, action: PipelineAction) -> Self {
        Self { phase, action }
    }
}

/// Ordered pipeline of steps with non-decreasing phase numbers.
///
/// # Examples
///
///     use taskflow::task::domain::{PhasePipeline, PhaseStep, PipelineAction};
///
///     let pipeline = PhasePipeline::new(vec![
///         PhaseStep::new(0, PipelineAction::Implement),
///         PhaseStep::new(1, PipelineAction::Check),
///     ])
///     .expect("ordered pipeline");
///     assert_eq!(pipeline.len(), 2);
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PhaseStep>", into = "Vec<PhaseStep>")]
pub struct PhasePipeline(Vec<PhaseStep>);

impl PhasePipeline {
    /// Creates a validated pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::PipelineOutOfOrder`] when a step's phase is
    /// lower than the phase of the step before it.
    pub fn new(steps: Vec<PhaseStep>) -> Result<Self, TaskDomainError> {
        for (previous, next) in steps.iter().zip(steps.iter().skip(1)) {
            if next.phase < previous.phase {
                return Err(TaskDomainError::PipelineOutOfOrder {
                    previous: previous.phase,
                    next: next.phase,
                });
            }
        }
        Ok(Self(steps))
    }

    /// Creates the conventional implement, check, finish, create-pr pipeline.
    #[must_use]
    pub fn standard() -> Self {
        Self(vec![
            PhaseStep::new(1, PipelineAction::Implement),
            PhaseStep::new(2, PipelineAction::Check),
            PhaseStep::new(3, PipelineAction::Finish),
            PhaseStep::new(4, PipelineAction::CreatePr),
        ])
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the pipeline declares no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the step at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PhaseStep> {
        self.0.get(index)
    }

    /// Returns the steps in order.
    #[must_use]
    pub fn steps(&self) -> &[PhaseStep] {
        &self.0
    }
}

impl TryFrom<Vec<PhaseStep>> for PhasePipeline {
    type Error = TaskDomainError;

    fn try_from(value: Vec<PhaseStep>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PhasePipeline> for Vec<PhaseStep> {
    fn from(value: PhasePipeline) -> Self {
        value.0
    }
}
