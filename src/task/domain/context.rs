//! Context index value objects: entries, action buckets, and default seeds.

use super::{DevType, PipelineAction, TaskDomainError};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a context entry names a single file or a directory of documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A single document.
    File,
    /// A directory whose markdown documents are loaded together.
    Directory,
}

impl EntryKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

impl TryFrom<&str> for EntryKind {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "directory" => Ok(Self::Directory),
            _ => Err(TaskDomainError::InvalidEntryKind(value.to_owned())),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of context surfaced to an agent, with the reason it matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    file: Utf8PathBuf,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<EntryKind>,
    reason: String,
}

impl ContextEntry {
    /// Creates a validated context entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyContextPath`] or
    /// [`TaskDomainError::EmptyContextReason`] when either value is blank, and
    /// [`TaskDomainError::ContextPathOutsideProject`] when the path is absolute
    /// or climbs above the project root.
    pub fn new(
        file: impl Into<Utf8PathBuf>,
        reason: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        let path = file.into();
        let trimmed_path = path.as_str().trim();
        if trimmed_path.is_empty() {
            return Err(TaskDomainError::EmptyContextPath);
        }
        let escapes = Utf8Path::new(trimmed_path).components().any(|component| {
            matches!(
                component,
                Utf8Component::Prefix(_) | Utf8Component::RootDir | Utf8Component::ParentDir
            )
        });
        if escapes {
            return Err(TaskDomainError::ContextPathOutsideProject(
                trimmed_path.to_owned(),
            ));
        }
        let raw_reason = reason.into();
        let trimmed_reason = raw_reason.trim();
        if trimmed_reason.is_empty() {
            return Err(TaskDomainError::EmptyContextReason);
        }
        Ok(Self {
            file: Utf8PathBuf::from(trimmed_path),
            kind: None,
            reason: trimmed_reason.to_owned(),
        })
    }

    /// Sets the entry kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Returns the referenced path.
    #[must_use]
    pub fn file(&self) -> &Utf8Path {
        &self.file
    }

    /// Returns the declared kind, if any.
    #[must_use]
    pub const fn kind(&self) -> Option<EntryKind> {
        self.kind
    }

    /// Returns the reason this entry is surfaced.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Ordered, path-unique context entries for one pipeline action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBucket {
    action: PipelineAction,
    entries: Vec<ContextEntry>,
}

/// Outcome of inserting an entry into an [`ActionBucket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The path was new and the entry was appended.
    Appended,
    /// The path existed and its reason (and kind, when given) was replaced.
    Updated,
    /// The path existed with identical data.
    Unchanged,
}

impl ActionBucket {
    /// Creates an empty bucket for `action`.
    #[must_use]
    pub const fn new(action: PipelineAction) -> Self {
        Self {
            action,
            entries: Vec::new(),
        }
    }

    /// Reconstructs a bucket from persisted entries, collapsing duplicate
    /// paths onto their first position.
    #[must_use]
    pub fn from_entries(action: PipelineAction, entries: Vec<ContextEntry>) -> Self {
        let mut bucket = Self::new(action);
        for entry in entries {
            bucket.upsert(entry);
        }
        bucket
    }

    /// Returns the action this bucket belongs to.
    #[must_use]
    pub const fn action(&self) -> PipelineAction {
        self.action
    }

    /// Returns the entries in presentation order.
    #[must_use]
    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    /// Consumes the bucket and returns its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<ContextEntry> {
        self.entries
    }

    /// Returns `true` when the bucket holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts `entry`, or updates the existing entry with the same path in
    /// place.
    ///
    /// An update keeps the original position, takes the new reason, and takes
    /// the new kind only when one is given.
    pub fn upsert(&mut self, entry: ContextEntry) -> UpsertOutcome {
        let Some(existing) = self
            .entries
            .iter_mut()
            .find(|current| current.file == entry.file)
        else {
            self.entries.push(entry);
            return UpsertOutcome::Appended;
        };

        let kind = entry.kind.or(existing.kind);
        if existing.reason == entry.reason && existing.kind == kind {
            return UpsertOutcome::Unchanged;
        }
        existing.reason = entry.reason;
        existing.kind = kind;
        UpsertOutcome::Updated
    }
}

/// Baseline context seeded for a development type.
///
/// Paths are expressed relative to the project root: `workflow_root` holds the
/// workflow conventions document, `spec_root` holds one directory per spec
/// area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultContext {
    implement: Vec<ContextEntry>,
    check: Vec<ContextEntry>,
}

impl DefaultContext {
    /// Builds the baseline entries for `dev_type`.
    ///
    /// # Errors
    ///
    /// Returns a [`TaskDomainError`] when a configured root is empty, absolute,
    /// or climbs above the project root.
    pub fn for_dev_type(
        dev_type: DevType,
        workflow_root: &Utf8Path,
        spec_root: &Utf8Path,
    ) -> Result<Self, TaskDomainError> {
        let mut implement = vec![
            ContextEntry::new(workflow_root.join("workflow.md"), "Workflow conventions")?
                .with_kind(EntryKind::File),
        ];
        let mut check = Vec::new();

        for area in dev_type.spec_areas() {
            let area_root = spec_root.join(area);
            implement.push(
                ContextEntry::new(area_root.clone(), format!("{} development specs", title(area)))?
                    .with_kind(EntryKind::Directory),
            );
            check.push(
                ContextEntry::new(
                    area_root.join("quality-guidelines.md"),
                    format!("{} quality checklist", title(area)),
                )?
                .with_kind(EntryKind::File),
            );
        }

        Ok(Self { implement, check })
    }

    /// Returns the seeded entries paired with their action, in seeding order.
    #[must_use]
    pub fn into_buckets(self) -> [(PipelineAction, Vec<ContextEntry>); 2] {
        [
            (PipelineAction::Implement, self.implement),
            (PipelineAction::Check, self.check),
        ]
    }
}

/// Capitalizes the first letter of a spec area name.
fn title(area: &str) -> String {
    let mut chars = area.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
