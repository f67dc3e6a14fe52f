//! In-memory document tree.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::task::ports::{DocumentKind, DocumentSource, DocumentSourceError, DocumentSourceResult};

/// Document source backed by a map of file paths to contents.
///
/// Directories exist implicitly as ancestors of stored files.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentSource {
    files: Arc<RwLock<BTreeMap<Utf8PathBuf, String>>>,
}

impl InMemoryDocumentSource {
    /// Creates an empty document tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentSourceError::Persistence`] when the lock is poisoned.
    pub fn insert(
        &self,
        path: impl Into<Utf8PathBuf>,
        contents: impl Into<String>,
    ) -> DocumentSourceResult<()> {
        let mut files = self.files.write().map_err(lock_error)?;
        files.insert(path.into(), contents.into());
        Ok(())
    }

    /// Adds a document, builder style.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentSourceError::Persistence`] when the lock is poisoned.
    pub fn with_document(
        self,
        path: impl Into<Utf8PathBuf>,
        contents: impl Into<String>,
    ) -> DocumentSourceResult<Self> {
        self.insert(path, contents)?;
        Ok(self)
    }
}

fn lock_error(err: impl ToString) -> DocumentSourceError {
    DocumentSourceError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl DocumentSource for InMemoryDocumentSource {
    async fn kind_of(&self, path: &Utf8Path) -> DocumentSourceResult<Option<DocumentKind>> {
        let files = self.files.read().map_err(lock_error)?;
        if files.contains_key(path) {
            return Ok(Some(DocumentKind::File));
        }
        let is_directory = files
            .keys()
            .any(|file| file.starts_with(path) && file.as_path() != path);
        Ok(is_directory.then_some(DocumentKind::Directory))
    }

    async fn read_document(&self, path: &Utf8Path) -> DocumentSourceResult<String> {
        let files = self.files.read().map_err(lock_error)?;
        files
            .get(path)
            .cloned()
            .ok_or_else(|| DocumentSourceError::NotFound(path.to_owned()))
    }

    async fn list_markdown(&self, path: &Utf8Path) -> DocumentSourceResult<Vec<Utf8PathBuf>> {
        let files = self.files.read().map_err(lock_error)?;
        let listed: Vec<Utf8PathBuf> = files
            .keys()
            .filter(|file| file.parent() == Some(path) && file.extension() == Some("md"))
            .cloned()
            .collect();
        if listed.is_empty() && !files.keys().any(|file| file.starts_with(path)) {
            return Err(DocumentSourceError::NotFound(path.to_owned()));
        }
        Ok(listed)
    }
}
