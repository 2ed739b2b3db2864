//! Tests for the configuration registry.
//!
//! Responsibilities:
//! - Test lookup precedence between environment, cache and defaults.
//! - Test load, save and write against real files.
//! - Test typed accessors, struct binding and concurrent access.
//! - Test that values never reach log output.
//!
//! Invariants:
//! - Tests that mutate environment variables use `serial_test` and `temp_env`.
//! - Keys are namespaced with `ENVREG_` so ambient variables cannot collide.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::sync::Mutex;

pub mod accessor_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}
