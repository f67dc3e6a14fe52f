//! Adapter implementations for task ports.

pub mod fs;
pub mod memory;
