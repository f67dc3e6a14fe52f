//! In-memory adapters for tests and embedded use.

mod context;
mod documents;
mod session;
mod task;

pub use context::InMemoryContextRepository;
pub use documents::InMemoryDocumentSource;
pub use session::InMemoryCurrentTaskStore;
pub use task::InMemoryTaskRepository;
