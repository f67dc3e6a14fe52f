//! Taskflow: task lifecycle and context injection for AI-assisted development.
//!
//! This crate keeps one record per task, tracks each task through its status
//! and phase pipeline, and decides which spec and pattern documents an agent
//! sees for each pipeline action.
//!
//! # Architecture
//!
//! Taskflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and document access
//! - **Adapters**: In-memory and filesystem implementations of ports
//!
//! # Modules
//!
//! - [`config`]: Workflow root layout and configuration loading
//! - [`task`]: Task lifecycle, context index, and context injection

pub mod config;
pub mod task;
