//! Filesystem task repository storing one `task.json` per task directory.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;

use super::{TASK_FILE, join_error, run_blocking_with, write_atomically};
use crate::config::ARCHIVE_DIR_NAME;
use crate::task::{
    domain::{Task, TaskSlug},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Task repository persisting records under the tasks directory.
#[derive(Debug, Clone)]
pub struct FsTaskRepository {
    project: Arc<Dir>,
    tasks: Utf8PathBuf,
    archive: Utf8PathBuf,
}

impl FsTaskRepository {
    /// Creates a repository over `tasks` and `archive`, both relative to the
    /// project directory.
    #[must_use]
    pub const fn new(project: Arc<Dir>, tasks: Utf8PathBuf, archive: Utf8PathBuf) -> Self {
        Self {
            project,
            tasks,
            archive,
        }
    }

    async fn blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&Layout) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let layout = Layout {
            project: Arc::clone(&self.project),
            tasks: self.tasks.clone(),
            archive: self.archive.clone(),
        };
        run_blocking_with(move || f(&layout), |err| {
            TaskRepositoryError::persistence(join_error(err))
        })
        .await
    }
}

struct Layout {
    project: Arc<Dir>,
    tasks: Utf8PathBuf,
    archive: Utf8PathBuf,
}

impl Layout {
    fn active_dir(&self, slug: &TaskSlug) -> Utf8PathBuf {
        self.tasks.join(slug.as_str())
    }

    fn archived_dir(&self, slug: &TaskSlug) -> Utf8PathBuf {
        self.archive.join(slug.as_str())
    }

    fn write_task(&self, task_dir: &Utf8Path, task: &Task) -> TaskRepositoryResult<()> {
        let mut encoded =
            serde_json::to_vec_pretty(task).map_err(TaskRepositoryError::persistence)?;
        encoded.push(b'\n');
        write_atomically(&self.project, &task_dir.join(TASK_FILE), &encoded)
            .map_err(TaskRepositoryError::persistence)
    }

    fn read_task(&self, task_dir: &Utf8Path) -> TaskRepositoryResult<Option<Task>> {
        let path = task_dir.join(TASK_FILE);
        let contents = match self.project.read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(TaskRepositoryError::persistence(err)),
        };
        let task = serde_json::from_str(&contents).map_err(TaskRepositoryError::persistence)?;
        Ok(Some(task))
    }

    fn list_tasks(&self, namespace: &Utf8Path) -> TaskRepositoryResult<Vec<Task>> {
        let entries = match self.project.read_dir(namespace) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(TaskRepositoryError::persistence(err)),
        };

        let mut tasks = Vec::new();
        for entry in entries {
            let dir_entry = entry.map_err(TaskRepositoryError::persistence)?;
            let is_dir = dir_entry
                .file_type()
                .map_err(TaskRepositoryError::persistence)?
                .is_dir();
            let name = dir_entry
                .file_name()
                .map_err(TaskRepositoryError::persistence)?;
            if !is_dir || name == ARCHIVE_DIR_NAME {
                continue;
            }
            if let Some(task) = self.read_task(&namespace.join(&name))? {
                tasks.push(task);
            }
        }
        tasks.sort_by(|left, right| left.id().cmp(right.id()));
        Ok(tasks)
    }
}

#[async_trait]
impl TaskRepository for FsTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let owned = task.clone();
        self.blocking(move |layout| {
            let slug = owned.id();
            let active = layout.active_dir(slug);
            if layout.project.exists(&active) || layout.project.exists(layout.archived_dir(slug)) {
                return Err(TaskRepositoryError::DuplicateTask(slug.clone()));
            }
            layout
                .project
                .create_dir_all(&active)
                .map_err(TaskRepositoryError::persistence)?;
            layout.write_task(&active, &owned)
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let owned = task.clone();
        self.blocking(move |layout| {
            let active = layout.active_dir(owned.id());
            if !layout.project.is_file(active.join(TASK_FILE)) {
                return Err(TaskRepositoryError::NotFound(owned.id().clone()));
            }
            layout.write_task(&active, &owned)
        })
        .await
    }

    async fn archive(&self, task: &Task) -> TaskRepositoryResult<()> {
        let owned = task.clone();
        self.blocking(move |layout| {
            let slug = owned.id();
            let active = layout.active_dir(slug);
            if !layout.project.is_file(active.join(TASK_FILE)) {
                return Err(TaskRepositoryError::NotFound(slug.clone()));
            }
            layout
                .project
                .create_dir_all(&layout.archive)
                .map_err(TaskRepositoryError::persistence)?;
            // The active record stays unarchived until the move succeeds.
            let archived = layout.archived_dir(slug);
            layout
                .project
                .rename(&active, &layout.project, &archived)
                .map_err(TaskRepositoryError::persistence)?;
            layout.write_task(&archived, &owned)
        })
        .await
    }

    async fn find_by_slug(&self, slug: &TaskSlug) -> TaskRepositoryResult<Option<Task>> {
        let owned = slug.clone();
        self.blocking(move |layout| {
            if let Some(task) = layout.read_task(&layout.active_dir(&owned))? {
                return Ok(Some(task));
            }
            layout.read_task(&layout.archived_dir(&owned))
        })
        .await
    }

    async fn list_active(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.blocking(|layout| layout.list_tasks(&layout.tasks)).await
    }

    async fn list_archived(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.blocking(|layout| layout.list_tasks(&layout.archive)).await
    }
}
