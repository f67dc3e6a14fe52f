//! Filesystem document source over the project directory.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;

use super::{join_error, run_blocking_with};
use crate::task::ports::{DocumentKind, DocumentSource, DocumentSourceError, DocumentSourceResult};

/// Reads documents from the project directory.
#[derive(Debug, Clone)]
pub struct FsDocumentSource {
    project: Arc<Dir>,
}

impl FsDocumentSource {
    /// Creates a document source over `project`.
    #[must_use]
    pub const fn new(project: Arc<Dir>) -> Self {
        Self { project }
    }

    async fn blocking<F, T>(&self, path: &Utf8Path, f: F) -> DocumentSourceResult<T>
    where
        F: FnOnce(&Dir, &Utf8Path) -> DocumentSourceResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let project = Arc::clone(&self.project);
        let owned = path.to_owned();
        run_blocking_with(move || f(&project, &owned), |err| {
            DocumentSourceError::persistence(join_error(err))
        })
        .await
    }
}

fn map_io(path: &Utf8Path, err: io::Error) -> DocumentSourceError {
    match err.kind() {
        io::ErrorKind::NotFound => DocumentSourceError::NotFound(path.to_owned()),
        io::ErrorKind::PermissionDenied | io::ErrorKind::InvalidData => {
            DocumentSourceError::Unreadable {
                path: path.to_owned(),
                reason: err.to_string(),
            }
        }
        _ => DocumentSourceError::persistence(err),
    }
}

#[async_trait]
impl DocumentSource for FsDocumentSource {
    async fn kind_of(&self, path: &Utf8Path) -> DocumentSourceResult<Option<DocumentKind>> {
        self.blocking(path, |project, target| match project.metadata(target) {
            Ok(metadata) if metadata.is_dir() => Ok(Some(DocumentKind::Directory)),
            Ok(_) => Ok(Some(DocumentKind::File)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(map_io(target, err)),
        })
        .await
    }

    async fn read_document(&self, path: &Utf8Path) -> DocumentSourceResult<String> {
        self.blocking(path, |project, target| {
            project
                .read_to_string(target)
                .map_err(|err| map_io(target, err))
        })
        .await
    }

    async fn list_markdown(&self, path: &Utf8Path) -> DocumentSourceResult<Vec<Utf8PathBuf>> {
        self.blocking(path, |project, target| {
            let entries = project.read_dir(target).map_err(|err| map_io(target, err))?;
            let mut documents = Vec::new();
            for entry in entries {
                let dir_entry = entry.map_err(DocumentSourceError::persistence)?;
                let is_file = dir_entry
                    .file_type()
                    .map_err(DocumentSourceError::persistence)?
                    .is_file();
                let name = dir_entry
                    .file_name()
                    .map_err(DocumentSourceError::persistence)?;
                if is_file && Utf8Path::new(&name).extension() == Some("md") {
                    documents.push(target.join(name));
                }
            }
            documents.sort();
            Ok(documents)
        })
        .await
    }
}
