//! Development type classification for tasks.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of development work a task performs.
///
/// The development type selects which spec areas seed the default context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevType {
    /// Server-side work.
    Backend,
    /// Client-side work.
    Frontend,
    /// Work spanning backend and frontend.
    Fullstack,
    /// Test-only work.
    Test,
    /// Documentation work.
    Docs,
}

impl DevType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Frontend => "frontend",
            Self::Fullstack => "fullstack",
            Self::Test => "test",
            Self::Docs => "docs",
        }
    }

    /// Returns the spec areas whose guides apply to this development type.
    #[must_use]
    pub const fn spec_areas(self) -> &'static [&'static str] {
        match self {
            Self::Backend => &["backend"],
            Self::Frontend => &["frontend"],
            Self::Fullstack => &["backend", "frontend"],
            Self::Test => &["testing"],
            Self::Docs => &["guides"],
        }
    }
}

impl TryFrom<&str> for DevType {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "backend" => Ok(Self::Backend),
            "frontend" => Ok(Self::Frontend),
            "fullstack" => Ok(Self::Fullstack),
            "test" => Ok(Self::Test),
            "docs" => Ok(Self::Docs),
            _ => Err(TaskDomainError::InvalidDevType(value.to_owned())),
        }
    }
}

impl fmt::Display for DevType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
