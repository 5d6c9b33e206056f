//! Shared utilities for lumen
//!
//! Currently the tracing subscriber setup used by the binary and by tests.

pub mod tracing;

pub use crate::tracing::{init, init_for_tests, init_with_default};
