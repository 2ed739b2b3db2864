//! Typed accessors over `DotEnv::get`.
//!
//! Every accessor is lenient: a missing key or a value that cannot be cast
//! yields the type's zero value. Use `try_get` to observe cast failures.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::dotenv::DotEnv;
use crate::cast::{Cast, parse_size_in_bytes};
use crate::error::CastError;

impl DotEnv {
    /// Resolve `key` and cast it to `T`, or `T::default()`.
    pub fn get_as<T: Cast + Default>(&self, key: &str) -> T {
        self.get(key).map(|value| T::cast(&value)).unwrap_or_default()
    }

    /// Resolve `key` and cast it strictly.
    ///
    /// Returns `Ok(None)` when no layer holds the key.
    pub fn try_get<T: Cast>(&self, key: &str) -> Result<Option<T>, CastError> {
        self.get(key).map(|value| T::try_cast(&value)).transpose()
    }

    pub fn get_string(&self, key: &str) -> String {
        self.get_as(key)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get_as(key)
    }

    pub fn get_int(&self, key: &str) -> i64 {
        self.get_as(key)
    }

    pub fn get_i32(&self, key: &str) -> i32 {
        self.get_as(key)
    }

    pub fn get_i64(&self, key: &str) -> i64 {
        self.get_as(key)
    }

    pub fn get_uint(&self, key: &str) -> u64 {
        self.get_as(key)
    }

    pub fn get_u32(&self, key: &str) -> u32 {
        self.get_as(key)
    }

    pub fn get_u64(&self, key: &str) -> u64 {
        self.get_as(key)
    }

    pub fn get_f64(&self, key: &str) -> f64 {
        self.get_as(key)
    }

    /// Durations accept `300ms`, `1h30m` or a bare nanosecond count.
    pub fn get_duration(&self, key: &str) -> Duration {
        self.get_as(key)
    }

    /// Timestamps accept RFC 3339, RFC 2822, common date layouts and Unix seconds.
    pub fn get_time(&self, key: &str) -> DateTime<Utc> {
        self.get_as(key)
    }

    /// Comma-separated integers, optionally wrapped in `[` `]`.
    pub fn get_int_slice(&self, key: &str) -> Vec<i64> {
        self.get_as(key)
    }

    pub fn get_string_slice(&self, key: &str) -> Vec<String> {
        self.get_as(key)
    }

    /// Sizes such as `1GB`, `12 MB` or `512`, as a byte count.
    pub fn get_size_in_bytes(&self, key: &str) -> u64 {
        parse_size_in_bytes(&self.get_string(key))
    }
}
