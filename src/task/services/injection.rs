//! Hook-side context injection.
//!
//! Turns the current task's context bucket for an action into the documents
//! and rendered text an agent receives before its turn.

use crate::task::{
    domain::{ContextEntry, EntryKind, PipelineAction, Task, TaskDomainError, TaskSlug},
    ports::{
        ContextRepository, CurrentTaskStore, CurrentTaskStoreError, DocumentKind, DocumentSource,
        DocumentSourceError, TaskRepository,
    },
    services::context::{ContextIndexError, ContextIndexService},
};
use camino::Utf8PathBuf;
use minijinja::Environment;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

const PAYLOAD_TEMPLATE: &str = "\
# Task context: {{ task.title }} ({{ task.id }})
Status: {{ task.status }} | Phase: {{ task.phase }} | Action: {{ action }}
{% for document in documents %}
## {{ document.path }}
Reason: {{ document.reason }}
{% if document.state == \"missing\" %}(missing)\
{% elif document.state == \"unreadable\" %}(unreadable)\
{% else %}{{ document.content }}{% endif %}
{% endfor %}";

/// Whether an injected document could be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentState {
    /// The content was read.
    Loaded,
    /// Nothing exists at the path.
    Missing,
    /// The path exists but could not be read as a project document.
    Unreadable,
}

/// One document surfaced to the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjectedDocument {
    /// Path of the document, relative to the project root.
    pub path: Utf8PathBuf,
    /// Reason copied from the context entry that referenced it.
    pub reason: String,
    /// Load outcome.
    pub state: DocumentState,
    /// Document text; `None` unless the state is [`DocumentState::Loaded`].
    pub content: Option<String>,
}

impl InjectedDocument {
    fn loaded(path: Utf8PathBuf, reason: &str, content: String) -> Self {
        Self {
            path,
            reason: reason.to_owned(),
            state: DocumentState::Loaded,
            content: Some(content),
        }
    }

    fn unavailable(path: Utf8PathBuf, reason: &str, state: DocumentState) -> Self {
        Self {
            path,
            reason: reason.to_owned(),
            state,
            content: None,
        }
    }
}

/// Context resolved for one agent turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionPayload {
    /// Task the context belongs to.
    pub task: TaskSlug,
    /// Action the agent is about to perform.
    pub action: PipelineAction,
    /// Documents in presentation order.
    pub documents: Vec<InjectedDocument>,
    /// Rendered text handed to the agent.
    pub rendered: String,
}

/// Problem found while validating a context entry against the project tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextProblem {
    /// Nothing exists at the path.
    Missing,
    /// The path exists but cannot be loaded.
    Unreadable,
    /// The entry declares one kind but the path holds the other.
    KindMismatch {
        /// Kind declared by the entry.
        declared: EntryKind,
        /// Kind found on disk.
        found: DocumentKind,
    },
}

/// Context entry that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextIssue {
    /// Bucket holding the entry.
    pub action: PipelineAction,
    /// Path of the entry.
    pub path: Utf8PathBuf,
    /// What is wrong with it.
    pub problem: ContextProblem,
}

/// Service-level errors for context injection.
#[derive(Debug, Error)]
pub enum ContextInjectionError {
    /// The action name is not recognized.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Context resolution failed.
    #[error(transparent)]
    Context(#[from] ContextIndexError),
    /// Pointer storage failed.
    #[error(transparent)]
    Session(#[from] CurrentTaskStoreError),
    /// Reading the project tree failed.
    #[error(transparent)]
    Documents(#[from] DocumentSourceError),
    /// The payload template failed to render.
    #[error("failed to render context payload: {0}")]
    Render(String),
}

/// Result type for context injection operations.
pub type ContextInjectionResult<T> = Result<T, ContextInjectionError>;

/// Resolves and loads the current task's context for an agent action.
#[derive(Clone)]
pub struct ContextInjectionService<R, X, S, D>
where
    R: TaskRepository,
    X: ContextRepository,
    S: CurrentTaskStore,
    D: DocumentSource,
{
    context: ContextIndexService<R, X>,
    tasks: Arc<R>,
    session: Arc<S>,
    documents: Arc<D>,
}

impl<R, X, S, D> ContextInjectionService<R, X, S, D>
where
    R: TaskRepository,
    X: ContextRepository,
    S: CurrentTaskStore,
    D: DocumentSource,
{
    /// Creates a new injection service.
    #[must_use]
    pub const fn new(
        context: ContextIndexService<R, X>,
        tasks: Arc<R>,
        session: Arc<S>,
        documents: Arc<D>,
    ) -> Self {
        Self {
            context,
            tasks,
            session,
            documents,
        }
    }

    /// Builds the payload for `action` from the current task.
    ///
    /// Returns `Ok(None)` when no task is current. Missing and unreadable
    /// documents are reported inside the payload, never as errors.
    ///
    /// # Errors
    ///
    /// Returns [`ContextInjectionError::Domain`] with
    /// [`TaskDomainError::UnknownAction`] for unrecognized actions, and
    /// resolution errors such as [`ContextIndexError::TaskArchived`]
    /// verbatim.
    pub async fn inject(&self, action: &str) -> ContextInjectionResult<Option<InjectionPayload>> {
        let parsed = PipelineAction::try_from(action)?;
        let Some(slug) = self.session.get().await? else {
            debug!(action = %parsed, "no current task, skipping injection");
            return Ok(None);
        };

        let entries = self.context.resolve(&slug, parsed).await?;
        let task = self
            .tasks
            .find_by_slug(&slug)
            .await
            .map_err(ContextIndexError::from)?
            .ok_or_else(|| ContextIndexError::TaskNotFound(slug.clone()))?;

        let mut documents = Vec::new();
        for entry in &entries {
            self.load_entry(entry, &mut documents).await?;
        }
        let rendered = render_payload(&task, parsed, &documents)?;
        debug!(task = %slug, action = %parsed, documents = documents.len(), "built context payload");

        Ok(Some(InjectionPayload {
            task: slug,
            action: parsed,
            documents,
            rendered,
        }))
    }

    /// Checks every context entry of the task against the project tree.
    ///
    /// # Errors
    ///
    /// Returns [`ContextIndexError::TaskNotFound`] or
    /// [`ContextIndexError::TaskArchived`] through
    /// [`ContextInjectionError::Context`].
    pub async fn validate(&self, slug: &TaskSlug) -> ContextInjectionResult<Vec<ContextIssue>> {
        let mut issues = Vec::new();
        for bucket in self.context.buckets(slug).await? {
            for entry in bucket.entries() {
                if let Some(problem) = self.check_entry(entry).await? {
                    issues.push(ContextIssue {
                        action: bucket.action(),
                        path: entry.file().to_owned(),
                        problem,
                    });
                }
            }
        }
        Ok(issues)
    }

    async fn check_entry(
        &self,
        entry: &ContextEntry,
    ) -> ContextInjectionResult<Option<ContextProblem>> {
        let found = match self.documents.kind_of(entry.file()).await {
            Ok(found) => found,
            Err(DocumentSourceError::Unreadable { .. }) => {
                return Ok(Some(ContextProblem::Unreadable));
            }
            Err(err) => return Err(err.into()),
        };
        let problem = match (entry.kind(), found) {
            (_, None) => Some(ContextProblem::Missing),
            (Some(declared @ EntryKind::File), Some(kind @ DocumentKind::Directory))
            | (Some(declared @ EntryKind::Directory), Some(kind @ DocumentKind::File)) => {
                Some(ContextProblem::KindMismatch {
                    declared,
                    found: kind,
                })
            }
            (_, Some(DocumentKind::File)) => {
                match self.documents.read_document(entry.file()).await {
                    Ok(_) => None,
                    Err(DocumentSourceError::NotFound(_)) => Some(ContextProblem::Missing),
                    Err(DocumentSourceError::Unreadable { .. }) => {
                        Some(ContextProblem::Unreadable)
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            (_, Some(DocumentKind::Directory)) => None,
        };
        Ok(problem)
    }

    async fn load_entry(
        &self,
        entry: &ContextEntry,
        documents: &mut Vec<InjectedDocument>,
    ) -> ContextInjectionResult<()> {
        let path = entry.file();
        let reason = entry.reason();
        // The tree decides how to load a path; a declared kind that disagrees
        // is reported by `validate`.
        let kind = match self.documents.kind_of(path).await {
            Ok(kind) => kind,
            Err(DocumentSourceError::Unreadable { reason: cause, .. }) => {
                warn!(%path, %cause, "context entry cannot be inspected");
                documents.push(InjectedDocument::unavailable(
                    path.to_owned(),
                    reason,
                    DocumentState::Unreadable,
                ));
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        match kind {
            None => {
                warn!(%path, "context entry points at a missing path");
                documents.push(InjectedDocument::unavailable(
                    path.to_owned(),
                    reason,
                    DocumentState::Missing,
                ));
            }
            Some(DocumentKind::File) => {
                documents.push(self.load_document(path.to_owned(), reason).await?);
            }
            Some(DocumentKind::Directory) => match self.documents.list_markdown(path).await {
                Ok(listed) => {
                    for document in listed {
                        documents.push(self.load_document(document, reason).await?);
                    }
                }
                Err(DocumentSourceError::Unreadable { reason: cause, .. }) => {
                    warn!(%path, %cause, "context directory cannot be listed");
                    documents.push(InjectedDocument::unavailable(
                        path.to_owned(),
                        reason,
                        DocumentState::Unreadable,
                    ));
                }
                Err(err) => return Err(err.into()),
            },
        }
        Ok(())
    }

    async fn load_document(
        &self,
        path: Utf8PathBuf,
        reason: &str,
    ) -> ContextInjectionResult<InjectedDocument> {
        match self.documents.read_document(&path).await {
            Ok(content) => Ok(InjectedDocument::loaded(path, reason, content)),
            Err(DocumentSourceError::NotFound(_)) => {
                warn!(%path, "context document disappeared while loading");
                Ok(InjectedDocument::unavailable(path, reason, DocumentState::Missing))
            }
            Err(DocumentSourceError::Unreadable { reason: cause, .. }) => {
                warn!(%path, %cause, "context document is unreadable");
                Ok(InjectedDocument::unavailable(path, reason, DocumentState::Unreadable))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Serialize)]
struct TaskView<'a> {
    id: &'a str,
    title: &'a str,
    status: &'a str,
    phase: usize,
}

fn render_payload(
    task: &Task,
    action: PipelineAction,
    documents: &[InjectedDocument],
) -> ContextInjectionResult<String> {
    let environment = Environment::new();
    let view = TaskView {
        id: task.id().as_str(),
        title: task.title(),
        status: task.status().as_str(),
        phase: task.current_phase(),
    };
    environment
        .render_str(
            PAYLOAD_TEMPLATE,
            minijinja::context! {
                task => view,
                action => action.as_str(),
                documents => documents,
            },
        )
        .map_err(|error| ContextInjectionError::Render(error.to_string()))
}
