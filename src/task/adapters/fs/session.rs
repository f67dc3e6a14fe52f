//! Filesystem current-task pointer holding a single slug.

use async_trait::async_trait;
use camino::Utf8PathBuf;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;

use super::{join_error, run_blocking_with, write_atomically};
use crate::task::{
    domain::TaskSlug,
    ports::{CurrentTaskStore, CurrentTaskStoreError, CurrentTaskStoreResult},
};

/// Current-task pointer persisted as a one-line file.
#[derive(Debug, Clone)]
pub struct FsCurrentTaskStore {
    project: Arc<Dir>,
    pointer: Utf8PathBuf,
}

impl FsCurrentTaskStore {
    /// Creates a pointer stored at `pointer`, relative to the project
    /// directory.
    #[must_use]
    pub const fn new(project: Arc<Dir>, pointer: Utf8PathBuf) -> Self {
        Self { project, pointer }
    }

    async fn blocking<F, T>(&self, f: F) -> CurrentTaskStoreResult<T>
    where
        F: FnOnce(&Dir, &Utf8PathBuf) -> CurrentTaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let project = Arc::clone(&self.project);
        let pointer = self.pointer.clone();
        run_blocking_with(move || f(&project, &pointer), |err| {
            CurrentTaskStoreError::persistence(join_error(err))
        })
        .await
    }
}

#[async_trait]
impl CurrentTaskStore for FsCurrentTaskStore {
    async fn get(&self) -> CurrentTaskStoreResult<Option<TaskSlug>> {
        self.blocking(|project, pointer| {
            let contents = match project.read_to_string(pointer) {
                Ok(contents) => contents,
                Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(err) => return Err(CurrentTaskStoreError::persistence(err)),
            };
            let value = contents.trim();
            if value.is_empty() {
                return Ok(None);
            }
            TaskSlug::new(value)
                .map(Some)
                .map_err(|_| CurrentTaskStoreError::Corrupt(value.to_owned()))
        })
        .await
    }

    async fn set(&self, task: &TaskSlug) -> CurrentTaskStoreResult<()> {
        let line = format!("{task}\n");
        self.blocking(move |project, pointer| {
            if let Some(parent) = pointer.parent().filter(|parent| !parent.as_str().is_empty()) {
                project
                    .create_dir_all(parent)
                    .map_err(CurrentTaskStoreError::persistence)?;
            }
            write_atomically(project, pointer, line.as_bytes())
                .map_err(CurrentTaskStoreError::persistence)
        })
        .await
    }

    async fn clear(&self) -> CurrentTaskStoreResult<()> {
        self.blocking(|project, pointer| match project.remove_file(pointer) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(CurrentTaskStoreError::persistence(err)),
        })
        .await
    }
}
