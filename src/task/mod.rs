//! Task lifecycle and context injection.
//!
//! This module tracks tasks through `planning → in_progress → completed →
//! archived`, moves a phase pointer along each task's pipeline of agent
//! actions, keeps per-action context buckets, and resolves those buckets
//! into the context an agent receives. The current task is held by an
//! injected session store rather than global state. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
