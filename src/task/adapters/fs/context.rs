//! Filesystem context repository storing one JSON Lines file per action.

use async_trait::async_trait;
use camino::Utf8PathBuf;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;

use super::{join_error, run_blocking_with, write_atomically};
use crate::task::{
    domain::{ActionBucket, ContextEntry, PipelineAction, TaskSlug},
    ports::{ContextRepository, ContextRepositoryError, ContextRepositoryResult},
};

/// Context repository writing `<tasks>/<slug>/<action>.jsonl` files.
#[derive(Debug, Clone)]
pub struct FsContextRepository {
    project: Arc<Dir>,
    tasks: Utf8PathBuf,
}

impl FsContextRepository {
    /// Creates a repository over `tasks`, relative to the project directory.
    #[must_use]
    pub const fn new(project: Arc<Dir>, tasks: Utf8PathBuf) -> Self {
        Self { project, tasks }
    }

    fn bucket_path(&self, task: &TaskSlug, action: PipelineAction) -> Utf8PathBuf {
        self.tasks
            .join(task.as_str())
            .join(format!("{}.jsonl", action.as_str()))
    }
}

fn decode_bucket(
    task: &TaskSlug,
    action: PipelineAction,
    contents: &str,
) -> ContextRepositoryResult<ActionBucket> {
    let entries = contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str::<ContextEntry>(line).map_err(|err| {
                ContextRepositoryError::Corrupt {
                    task: task.clone(),
                    action,
                    reason: err.to_string(),
                }
            })
        })
        .collect::<ContextRepositoryResult<Vec<_>>>()?;
    Ok(ActionBucket::from_entries(action, entries))
}

fn encode_bucket(bucket: &ActionBucket) -> ContextRepositoryResult<Vec<u8>> {
    let mut encoded = Vec::new();
    for entry in bucket.entries() {
        serde_json::to_writer(&mut encoded, entry).map_err(ContextRepositoryError::persistence)?;
        encoded.push(b'\n');
    }
    Ok(encoded)
}

#[async_trait]
impl ContextRepository for FsContextRepository {
    async fn load_bucket(
        &self,
        task: &TaskSlug,
        action: PipelineAction,
    ) -> ContextRepositoryResult<Option<ActionBucket>> {
        let project = Arc::clone(&self.project);
        let task_dir = self.tasks.join(task.as_str());
        let path = self.bucket_path(task, action);
        let slug = task.clone();
        run_blocking_with(
            move || {
                if !project.is_dir(&task_dir) {
                    return Err(ContextRepositoryError::NotFound(slug));
                }
                match project.read_to_string(&path) {
                    Ok(contents) => decode_bucket(&slug, action, &contents).map(Some),
                    Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
                    Err(err) => Err(ContextRepositoryError::persistence(err)),
                }
            },
            |err| ContextRepositoryError::persistence(join_error(err)),
        )
        .await
    }

    async fn save_bucket(
        &self,
        task: &TaskSlug,
        bucket: &ActionBucket,
    ) -> ContextRepositoryResult<()> {
        let project = Arc::clone(&self.project);
        let task_dir = self.tasks.join(task.as_str());
        let path = self.bucket_path(task, bucket.action());
        let slug = task.clone();
        let encoded = encode_bucket(bucket)?;
        run_blocking_with(
            move || {
                if !project.is_dir(&task_dir) {
                    return Err(ContextRepositoryError::NotFound(slug));
                }
                write_atomically(&project, &path, &encoded)
                    .map_err(ContextRepositoryError::persistence)
            },
            |err| ContextRepositoryError::persistence(join_error(err)),
        )
        .await
    }
}
