//! Workflow root configuration.
//!
//! A project keeps its workflow state under a single root directory
//! (`.taskflow` by default). An optional `config.yaml` inside that root
//! overrides the layout.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Environment variable overriding the workflow root directory.
pub const ROOT_ENV_VAR: &str = "TASKFLOW_ROOT";

/// File name of the optional configuration inside the workflow root.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Directory name of the archive namespace inside the tasks directory.
pub const ARCHIVE_DIR_NAME: &str = "archive";

/// Layout of the workflow root, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Workflow root directory.
    #[serde(default = "default_root")]
    pub root: Utf8PathBuf,

    /// Directory holding task records, relative to `root`.
    #[serde(default = "default_tasks_dir")]
    pub tasks_dir: Utf8PathBuf,

    /// File holding the current-task pointer, relative to `root`.
    #[serde(default = "default_pointer_file")]
    pub pointer_file: Utf8PathBuf,

    /// Directory of spec areas used for default context. Defaults to
    /// `<root>/spec`.
    #[serde(default)]
    pub spec_root: Option<Utf8PathBuf>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            tasks_dir: default_tasks_dir(),
            pointer_file: default_pointer_file(),
            spec_root: None,
        }
    }
}

fn default_root() -> Utf8PathBuf {
    Utf8PathBuf::from(".taskflow")
}

fn default_tasks_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("tasks")
}

fn default_pointer_file() -> Utf8PathBuf {
    Utf8PathBuf::from(".current-task")
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The configuration file is not valid YAML for [`WorkflowConfig`].
    #[error("failed to parse configuration {path}: {source}")]
    Parse {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
}

impl WorkflowConfig {
    /// Sets the workflow root directory.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<Utf8PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Sets the tasks directory, relative to the workflow root.
    #[must_use]
    pub fn with_tasks_dir(mut self, tasks_dir: impl Into<Utf8PathBuf>) -> Self {
        self.tasks_dir = tasks_dir.into();
        self
    }

    /// Sets the pointer file, relative to the workflow root.
    #[must_use]
    pub fn with_pointer_file(mut self, pointer_file: impl Into<Utf8PathBuf>) -> Self {
        self.pointer_file = pointer_file.into();
        self
    }

    /// Sets the spec root, relative to the project root.
    #[must_use]
    pub fn with_spec_root(mut self, spec_root: impl Into<Utf8PathBuf>) -> Self {
        self.spec_root = Some(spec_root.into());
        self
    }

    /// Returns the tasks directory relative to the project root.
    #[must_use]
    pub fn tasks_path(&self) -> Utf8PathBuf {
        self.root.join(&self.tasks_dir)
    }

    /// Returns the archive namespace relative to the project root.
    #[must_use]
    pub fn archive_path(&self) -> Utf8PathBuf {
        self.tasks_path().join(ARCHIVE_DIR_NAME)
    }

    /// Returns the pointer file relative to the project root.
    #[must_use]
    pub fn pointer_path(&self) -> Utf8PathBuf {
        self.root.join(&self.pointer_file)
    }

    /// Returns the spec root relative to the project root.
    #[must_use]
    pub fn spec_root(&self) -> Utf8PathBuf {
        self.spec_root
            .clone()
            .unwrap_or_else(|| self.root.join("spec"))
    }

    /// Parses configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not a valid
    /// configuration; `path` is only used for the error message.
    pub fn from_yaml(path: &Utf8Path, contents: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Loads configuration from `path` inside `project`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is malformed.
    pub fn load(project: &Dir, path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = project
            .read_to_string(path)
            .map_err(|source| ConfigError::Read {
                path: path.to_owned(),
                source,
            })?;
        Self::from_yaml(path, &contents)
    }

    /// Loads `<root>/config.yaml` from `project`, falling back to defaults
    /// when the file does not exist.
    ///
    /// The root is taken from `TASKFLOW_ROOT` when set. A root named in the
    /// environment wins over a `root` key inside the file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file exists but cannot be read or
    /// parsed.
    pub fn load_or_default(project: &Dir) -> Result<Self, ConfigError> {
        let env_root = std::env::var(ROOT_ENV_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(Utf8PathBuf::from);
        let root = env_root.clone().unwrap_or_else(default_root);
        let path = root.join(CONFIG_FILE_NAME);

        let mut config = if project.is_file(&path) {
            Self::load(project, &path)?
        } else {
            Self::default().with_root(root)
        };
        if let Some(overridden) = env_root {
            config.root = overridden;
        }
        tracing::debug!(root = %config.root, "loaded workflow configuration");
        Ok(config)
    }
}
