//! Filesystem adapters rooted at a project directory.
//!
//! All access goes through a capability handle on the project root, so no
//! adapter can reach outside it. Blocking I/O runs on the blocking thread
//! pool.
//!
//! Layout, relative to the project root:
//!
//! ```text
//! <root>/.current-task                  current-task pointer
//! <root>/tasks/<slug>/task.json         task record
//! <root>/tasks/<slug>/<action>.jsonl    context bucket, one entry per line
//! <root>/tasks/archive/<slug>/...       archived tasks
//! ```

mod context;
mod documents;
mod session;
mod task;

pub use context::FsContextRepository;
pub use documents::FsDocumentSource;
pub use session::FsCurrentTaskStore;
pub use task::FsTaskRepository;

use crate::config::WorkflowConfig;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;

/// Name of the task record file inside a task directory.
const TASK_FILE: &str = "task.json";

/// Handle on a project directory plus its workflow layout.
///
/// Hands out the filesystem adapters, which all share one directory handle.
#[derive(Debug, Clone)]
pub struct FsWorkflow {
    project: Arc<Dir>,
    config: WorkflowConfig,
}

impl FsWorkflow {
    /// Opens the project directory at `project_root`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while opening the directory.
    pub fn open(project_root: &Utf8Path, config: WorkflowConfig) -> io::Result<Self> {
        let dir = Dir::open_ambient_dir(project_root, ambient_authority())?;
        Ok(Self::from_dir(dir, config))
    }

    /// Wraps an already opened project directory.
    #[must_use]
    pub fn from_dir(project: Dir, config: WorkflowConfig) -> Self {
        Self {
            project: Arc::new(project),
            config,
        }
    }

    /// Returns the workflow layout.
    #[must_use]
    pub const fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Returns a task repository over this project.
    #[must_use]
    pub fn task_repository(&self) -> FsTaskRepository {
        FsTaskRepository::new(
            Arc::clone(&self.project),
            self.config.tasks_path(),
            self.config.archive_path(),
        )
    }

    /// Returns a context repository over this project.
    #[must_use]
    pub fn context_repository(&self) -> FsContextRepository {
        FsContextRepository::new(Arc::clone(&self.project), self.config.tasks_path())
    }

    /// Returns the current-task pointer of this project.
    #[must_use]
    pub fn current_task_store(&self) -> FsCurrentTaskStore {
        FsCurrentTaskStore::new(Arc::clone(&self.project), self.config.pointer_path())
    }

    /// Returns a document source over this project.
    #[must_use]
    pub fn document_source(&self) -> FsDocumentSource {
        FsDocumentSource::new(Arc::clone(&self.project))
    }
}

/// Runs a blocking filesystem operation on the blocking thread pool and maps
/// join errors into the caller's error type.
async fn run_blocking_with<F, T, E, M>(f: F, map_err: M) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: FnOnce(tokio::task::JoinError) -> E,
{
    tokio::task::spawn_blocking(f).await.map_err(map_err)?
}

/// Converts a failed blocking task into an I/O error.
fn join_error(err: tokio::task::JoinError) -> io::Error {
    io::Error::other(format!("blocking task join error: {err}"))
}

/// Writes `contents` to a temporary sibling of `path`, then renames it over
/// `path` so readers never see a partial file.
fn write_atomically(dir: &Dir, path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, path.to_string()))?;
    let temporary = path.with_file_name(format!(".{file_name}.tmp"));
    dir.write(&temporary, contents)?;
    dir.rename(&temporary, dir, path)
}
