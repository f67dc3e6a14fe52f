//! Domain model for task lifecycle and context injection.
//!
//! The task domain models the status and phase state machine, the phase
//! pipeline, and the per-action context buckets while keeping all
//! infrastructure concerns outside of the domain boundary.

mod context;
mod dev_type;
mod error;
mod ids;
mod linkage;
mod pipeline;
mod task;

pub use context::{ActionBucket, ContextEntry, DefaultContext, EntryKind, UpsertOutcome};
pub use dev_type::DevType;
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskSlug;
pub use linkage::TaskLinkage;
pub use pipeline::{PhasePipeline, PhaseStep, PipelineAction};
pub use task::{Task, TaskStatus};
