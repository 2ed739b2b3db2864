//! Layered configuration registry.
//!
//! Responsibilities:
//! - Own the configuration cache loaded from a dotenv file or filled by `set`.
//! - Resolve lookups by precedence: environment, then cache, then binding defaults.
//! - Serialize the cache back to disk through the durable writer.
//! - Bind resolved values onto caller-declared structs (`Bind`).
//!
//! Does NOT handle:
//! - Parsing dotenv syntax (see `decoder`).
//! - Type coercion rules (see `cast.rs`).
//! - The process-wide instance (see `global.rs`).
//!
//! Invariants / Assumptions:
//! - Cache keys are always upper-cased and carry the active prefix.
//! - A prefix is applied at most once; already-prefixed keys are not doubled.
//! - `load` swaps the whole cache only after a successful decode.
//! - Environment variables outrank cached values; empty environment values
//!   count only when `allow_empty_env_vars` is enabled.
//! - Values are never logged.

mod accessors;
mod binding;
mod builder;
mod dotenv;
mod encode;

#[cfg(test)]
mod tests;

pub use binding::{Bind, Binder, Field};
pub use builder::DotEnvBuilder;
pub use dotenv::{DotEnv, Layer};
