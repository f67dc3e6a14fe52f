//! Identifier types for the task domain.

use super::TaskDomainError;
use heck::ToKebabCase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a task slug, in bytes.
const MAX_SLUG_LENGTH: usize = 64;

/// Slug reserved for the archive namespace inside the tasks directory.
const RESERVED_SLUG: &str = "archive";

/// Unique, immutable task identifier.
///
/// Slugs double as directory names in the filesystem adapter, so they are
/// restricted to lowercase ASCII letters, digits, and inner hyphens.
///
/// # Examples
///
///     use taskflow::task::domain::TaskSlug;
///
///     let slug = TaskSlug::new("login-fix").expect("valid slug");
///     assert_eq!(slug.as_str(), "login-fix");
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskSlug(String);

impl TaskSlug {
    /// Creates a validated slug.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidSlug`] when the value is empty, longer
    /// than 64 bytes, contains characters outside `[a-z0-9-]`, starts or ends
    /// with a hyphen, or equals the reserved `archive` namespace.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        if Self::is_invalid_slug(&raw) {
            return Err(TaskDomainError::InvalidSlug(raw));
        }
        Ok(Self(raw))
    }

    /// Derives a slug from a free-form title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidSlug`] when the title yields no usable
    /// characters or a slug that is otherwise invalid.
    ///
    /// # Examples
    ///
    ///     use taskflow::task::domain::TaskSlug;
    ///
    ///     let slug = TaskSlug::from_title("Fix Login Redirect").expect("valid title");
    ///     assert_eq!(slug.as_str(), "fix-login-redirect");
    pub fn from_title(title: &str) -> Result<Self, TaskDomainError> {
        let kebab: String = title
            .to_kebab_case()
            .chars()
            .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '-')
            .collect();
        let trimmed: String = kebab
            .split('-')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        let truncated = truncate_slug(&trimmed);
        Self::new(truncated).map_err(|_| TaskDomainError::InvalidSlug(title.to_owned()))
    }

    fn is_invalid_slug(value: &str) -> bool {
        let has_invalid_length = value.is_empty() || value.len() > MAX_SLUG_LENGTH;
        let has_invalid_chars = !value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-');
        let has_edge_hyphen = value.starts_with('-') || value.ends_with('-');

        has_invalid_length || has_invalid_chars || has_edge_hyphen || value == RESERVED_SLUG
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Cuts an ASCII slug to the length limit without leaving a trailing hyphen.
fn truncate_slug(value: &str) -> String {
    let limited: String = value.chars().take(MAX_SLUG_LENGTH).collect();
    limited.trim_end_matches('-').to_owned()
}

impl TryFrom<String> for TaskSlug {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskSlug> for String {
    fn from(value: TaskSlug) -> Self {
        value.0
    }
}

impl AsRef<str> for TaskSlug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
