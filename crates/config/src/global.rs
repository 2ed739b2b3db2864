//! Process-wide registry and free functions that delegate to it.
//!
//! Responsibilities:
//! - Hold one shared `DotEnv` for callers that do not thread an instance through.
//! - Swap that instance for tests (`replace_global`) and restore it afterwards.
//! - Mirror every `DotEnv` operation as a free function.
//!
//! Does NOT handle:
//! - Any lookup or persistence logic; everything forwards to `DotEnv`.
//!
//! Invariants / Assumptions:
//! - The global starts as `DotEnv::new()`: `.env` in the current directory,
//!   no prefix, nothing loaded.
//! - Each free function resolves the global once, so a concurrent swap never
//!   splits a single call across two registries.
//! - Guards restore in reverse order of creation when nested.
//!
//! Library code should prefer an explicit `DotEnv` (or `Arc<DotEnv>`); the
//! global exists for binaries and tests.

use std::path::PathBuf;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::decoder::Decoder;
use crate::error::ConfigError;
use crate::registry::{Bind, DotEnv, Layer};
use crate::value::Value;

static GLOBAL: LazyLock<RwLock<Arc<DotEnv>>> =
    LazyLock::new(|| RwLock::new(Arc::new(DotEnv::new())));

/// The current process-wide registry.
pub fn global() -> Arc<DotEnv> {
    Arc::clone(&GLOBAL.read())
}

/// Restores the previously installed global registry when dropped.
#[must_use = "dropping the guard immediately restores the previous registry"]
#[derive(Debug)]
pub struct GlobalGuard {
    previous: Option<Arc<DotEnv>>,
}

impl GlobalGuard {
    /// Put the previous registry back now.
    pub fn restore(mut self) {
        self.swap_back();
    }

    /// Keep the replacement installed after the guard goes away.
    pub fn keep(mut self) {
        self.previous = None;
    }

    fn swap_back(&mut self) {
        if let Some(previous) = self.previous.take() {
            *GLOBAL.write() = previous;
            tracing::debug!("Global registry restored");
        }
    }
}

impl Drop for GlobalGuard {
    fn drop(&mut self) {
        self.swap_back();
    }
}

/// Install `registry` as the global until the returned guard is dropped.
pub fn replace_global(registry: impl Into<Arc<DotEnv>>) -> GlobalGuard {
    let previous = std::mem::replace(&mut *GLOBAL.write(), registry.into());
    tracing::debug!("Global registry replaced");
    GlobalGuard {
        previous: Some(previous),
    }
}

pub fn load() -> Result<(), ConfigError> {
    global().load()
}

pub fn load_with_decoder<D: Decoder + 'static>(decoder: D) -> Result<(), ConfigError> {
    global().load_with_decoder(decoder)
}

pub fn load_if_exists() -> Result<bool, ConfigError> {
    global().load_if_exists()
}

pub fn config_file() -> PathBuf {
    global().config_file()
}

pub fn set_config_file(path: impl Into<PathBuf>) {
    global().set_config_file(path);
}

pub fn set_prefix(prefix: &str) {
    global().set_prefix(prefix);
}

pub fn prefix() -> String {
    global().prefix()
}

pub fn allow_empty_env(allow: bool) {
    global().allow_empty_env_vars(allow);
}

pub fn lookup(key: &str) -> Option<(Value, Layer)> {
    global().lookup(key)
}

pub fn get(key: &str) -> Option<Value> {
    global().get(key)
}

pub fn is_set(key: &str) -> bool {
    global().is_set(key)
}

pub fn set(key: &str, value: impl Into<Value>) {
    global().set(key, value);
}

pub fn save() -> Result<(), ConfigError> {
    global().save()
}

pub fn write(key: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
    global().write(key, value)
}

pub fn unmarshal<T: Bind + ?Sized>(target: &mut T) -> Result<(), ConfigError> {
    global().unmarshal(target)
}

pub fn bind_new<T: Bind + Default>() -> Result<T, ConfigError> {
    global().bind_new()
}

pub fn get_string(key: &str) -> String {
    global().get_string(key)
}

pub fn get_bool(key: &str) -> bool {
    global().get_bool(key)
}

pub fn get_int(key: &str) -> i64 {
    global().get_int(key)
}

pub fn get_i32(key: &str) -> i32 {
    global().get_i32(key)
}

pub fn get_i64(key: &str) -> i64 {
    global().get_i64(key)
}

pub fn get_uint(key: &str) -> u64 {
    global().get_uint(key)
}

pub fn get_u32(key: &str) -> u32 {
    global().get_u32(key)
}

pub fn get_u64(key: &str) -> u64 {
    global().get_u64(key)
}

pub fn get_f64(key: &str) -> f64 {
    global().get_f64(key)
}

pub fn get_duration(key: &str) -> Duration {
    global().get_duration(key)
}

pub fn get_time(key: &str) -> DateTime<Utc> {
    global().get_time(key)
}

pub fn get_int_slice(key: &str) -> Vec<i64> {
    global().get_int_slice(key)
}

pub fn get_string_slice(key: &str) -> Vec<String> {
    global().get_string_slice(key)
}

pub fn get_size_in_bytes(key: &str) -> u64 {
    global().get_size_in_bytes(key)
}
