//! Branch, worktree, commit, and pull request metadata for tasks.
//!
//! Linkage values are descriptive only: no lifecycle rule reads them.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Version-control metadata attached to a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLinkage {
    /// Working branch for the task.
    #[serde(default)]
    pub branch: Option<String>,
    /// Branch the work will merge into.
    #[serde(default)]
    pub base_branch: Option<String>,
    /// Worktree checkout used for the task.
    #[serde(default)]
    pub worktree_path: Option<Utf8PathBuf>,
    /// Commit that delivered the work.
    #[serde(default)]
    pub commit: Option<String>,
    /// Pull request opened for the work.
    #[serde(default)]
    pub pr_url: Option<String>,
}

impl TaskLinkage {
    /// Sets the working branch.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Sets the base branch.
    #[must_use]
    pub fn with_base_branch(mut self, base_branch: impl Into<String>) -> Self {
        self.base_branch = Some(base_branch.into());
        self
    }

    /// Sets the worktree path.
    #[must_use]
    pub fn with_worktree_path(mut self, worktree_path: impl Into<Utf8PathBuf>) -> Self {
        self.worktree_path = Some(worktree_path.into());
        self
    }

    /// Sets the delivering commit.
    #[must_use]
    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }

    /// Sets the pull request URL.
    #[must_use]
    pub fn with_pr_url(mut self, pr_url: impl Into<String>) -> Self {
        self.pr_url = Some(pr_url.into());
        self
    }

    /// Overlays every field that `update` sets onto `self`.
    #[must_use]
    pub fn merged_with(self, update: Self) -> Self {
        Self {
            branch: update.branch.or(self.branch),
            base_branch: update.base_branch.or(self.base_branch),
            worktree_path: update.worktree_path.or(self.worktree_path),
            commit: update.commit.or(self.commit),
            pr_url: update.pr_url.or(self.pr_url),
        }
    }
}
