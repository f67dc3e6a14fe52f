//! Read-only access to the project documents referenced by context entries.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Result type for document source operations.
pub type DocumentSourceResult<T> = Result<T, DocumentSourceError>;

/// Kind of filesystem object found at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
}

/// Project tree reader used for context injection and validation.
///
/// Paths are relative to the project root.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Returns what exists at `path`, or `None` when nothing does.
    async fn kind_of(&self, path: &Utf8Path) -> DocumentSourceResult<Option<DocumentKind>>;

    /// Reads a UTF-8 document.
    async fn read_document(&self, path: &Utf8Path) -> DocumentSourceResult<String>;

    /// Lists the markdown files directly inside `path`, sorted lexically.
    async fn list_markdown(&self, path: &Utf8Path) -> DocumentSourceResult<Vec<Utf8PathBuf>>;
}

/// Errors returned by document source implementations.
#[derive(Debug, Clone, Error)]
pub enum DocumentSourceError {
    /// Nothing exists at the path.
    #[error("document not found: {0}")]
    NotFound(Utf8PathBuf),

    /// The path exists but cannot be read as a project document, for example
    /// because it leaves the project tree or is not valid UTF-8.
    #[error("document {path} is unreadable: {reason}")]
    Unreadable {
        /// Path that failed to load.
        path: Utf8PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// Persistence-layer failure.
    #[error("document source error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DocumentSourceError {
    /// Wraps an I/O error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
