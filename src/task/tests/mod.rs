//! Unit tests for the task module.

mod context_service_tests;
mod support;
