//! Builder for a configured `DotEnv` registry.
//!
//! Responsibilities:
//! - Collect the config file path, prefix, empty-variable policy and decoder
//!   before the registry exists.
//!
//! Does NOT handle:
//! - Loading the file (call `DotEnv::load` on the built registry).
//!
//! Invariants / Assumptions:
//! - Unset options fall back to the `DotEnv::new()` defaults.
//! - The prefix is normalized exactly as `DotEnv::set_prefix` does.

use std::path::PathBuf;
use std::sync::Arc;

use super::dotenv::{DotEnv, Settings, normalize_prefix};
use crate::decoder::Decoder;

/// Builder-pattern constructor for [`DotEnv`].
#[derive(Debug, Default)]
pub struct DotEnvBuilder {
    config_file: Option<PathBuf>,
    prefix: Option<String>,
    allow_empty_env_vars: bool,
    decoder: Option<Arc<dyn Decoder>>,
}

impl DotEnvBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config file read by `load` and written by `save`.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_allow_empty_env_vars(mut self, allow: bool) -> Self {
        self.allow_empty_env_vars = allow;
        self
    }

    /// Replace the default dotenv decoder.
    pub fn with_decoder<D: Decoder + 'static>(mut self, decoder: D) -> Self {
        self.decoder = Some(Arc::new(decoder));
        self
    }

    pub fn build(self) -> DotEnv {
        let mut settings = Settings::default();
        if let Some(path) = self.config_file {
            settings.config_file = path;
        }
        if let Some(prefix) = self.prefix {
            settings.prefix = normalize_prefix(&prefix);
        }
        settings.allow_empty_env_vars = self.allow_empty_env_vars;
        if let Some(decoder) = self.decoder {
            settings.decoder = decoder;
        }
        DotEnv::from_settings(settings)
    }
}
