//! Error types for decoding, loading, saving and binding configuration.
//!
//! Responsibilities:
//! - Define decoder failures (`DecodeError`) with 1-based line numbers.
//! - Define registry failures (`ConfigError`) with the file path for context.
//! - Define strict caster failures (`CastError`).
//!
//! Does NOT handle:
//! - Lenient casting, which never fails (see `cast.rs`).
//! - Absent keys, which are `None` rather than an error (see `registry`).
//!
//! Invariants:
//! - Errors NEVER include raw `.env` line contents or values to prevent secret leakage.
//! - A `DecodeError` always aborts the whole decode; no partial mapping escapes.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while turning dotenv bytes into a key/value mapping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A key contains whitespace without the `export ` marker, or is empty.
    #[error("invalid key on line {line}: keys may only contain spaces after an `export ` marker")]
    InvalidKey { line: usize },

    /// The document ended inside a quoted value.
    #[error("unterminated quoted value starting on line {line}")]
    UnterminatedQuote { line: usize },

    /// An `export` entry cannot be stored in the process environment.
    #[error("invalid export on line {line}: key must be non-empty and free of NUL bytes")]
    InvalidExport { line: usize },

    /// The document is not valid UTF-8.
    #[error("config file is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },

    /// Failure reported by a third-party decoder.
    #[error("{0}")]
    Custom(String),
}

impl DecodeError {
    /// Line the error points at, if the variant carries one.
    pub fn line(&self) -> Option<usize> {
        match self {
            DecodeError::InvalidKey { line }
            | DecodeError::UnterminatedQuote { line }
            | DecodeError::InvalidExport { line } => Some(*line),
            DecodeError::InvalidUtf8 { .. } | DecodeError::Custom(_) => None,
        }
    }
}

/// Errors that can occur while loading, saving or binding configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found at {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config file at {path}: {kind}")]
    Read {
        path: PathBuf,
        kind: ErrorKind,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file at {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("failed to write config file at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind {key}: {message}")]
    Bind { key: String, message: String },
}

impl ConfigError {
    /// Returns `true` when the configured file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. })
    }

    /// Line number of a decode failure, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ConfigError::Decode { source, .. } => source.line(),
            _ => None,
        }
    }

    pub(crate) fn from_read(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == ErrorKind::NotFound {
            ConfigError::NotFound { path }
        } else {
            ConfigError::Read {
                path,
                kind: source.kind(),
                source,
            }
        }
    }
}

/// Errors returned by the strict caster (`Cast::try_cast`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CastError {
    #[error("cannot cast to {target}: {reason}")]
    Invalid {
        target: &'static str,
        reason: String,
    },

    #[error("value out of range for {target}")]
    Overflow { target: &'static str },
}

impl CastError {
    pub(crate) fn invalid(target: &'static str, reason: impl Into<String>) -> Self {
        CastError::Invalid {
            target,
            reason: reason.into(),
        }
    }
}
