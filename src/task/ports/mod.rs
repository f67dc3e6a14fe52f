//! Port contracts for task lifecycle and context injection.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod context;
pub mod documents;
pub mod repository;
pub mod session;

pub use context::{ContextRepository, ContextRepositoryError, ContextRepositoryResult};
pub use documents::{DocumentKind, DocumentSource, DocumentSourceError, DocumentSourceResult};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use session::{CurrentTaskStore, CurrentTaskStoreError, CurrentTaskStoreResult};
