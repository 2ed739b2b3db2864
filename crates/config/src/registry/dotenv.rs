//! The `DotEnv` registry: settings, cache and the core operations.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use super::binding::{Bind, Binder};
use super::builder::DotEnvBuilder;
use super::encode::encode_entries;
use crate::constants::{DEFAULT_CONFIG_FILE, DEFAULT_FILE_MODE, PREFIX_SEPARATOR};
use crate::decoder::{Decoder, DefaultDecoder, is_decodable_key};
use crate::error::ConfigError;
use crate::value::Value;
use crate::writer::write_atomic;

/// Precedence layer a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Environment,
    Cache,
    /// Declared default of a bound field.
    Default,
}

#[derive(Clone)]
pub(super) struct Settings {
    pub(super) config_file: PathBuf,
    /// Upper-cased prefix including the trailing separator, or empty.
    pub(super) prefix: String,
    pub(super) allow_empty_env_vars: bool,
    pub(super) decoder: Arc<dyn Decoder>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            prefix: String::new(),
            allow_empty_env_vars: false,
            decoder: Arc::new(DefaultDecoder),
        }
    }
}

/// A prioritized `.env` configuration registry.
///
/// Lookups check, in order:
/// 1. process environment variables
/// 2. the cache (loaded from the config file or filled with [`DotEnv::set`])
/// 3. declared defaults, when binding a struct through [`Bind`]
///
/// All operations take `&self`; share one registry across threads with `Arc<DotEnv>`.
pub struct DotEnv {
    settings: RwLock<Settings>,
    cache: RwLock<Option<HashMap<String, Value>>>,
}

impl Default for DotEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DotEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = self.settings.read();
        let entries = self.cache.read().as_ref().map(HashMap::len);
        f.debug_struct("DotEnv")
            .field("config_file", &settings.config_file)
            .field("prefix", &settings.prefix)
            .field("allow_empty_env_vars", &settings.allow_empty_env_vars)
            .field("decoder", &settings.decoder)
            .field("entries", &entries)
            .finish()
    }
}

pub(super) fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches(PREFIX_SEPARATOR);
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}{PREFIX_SEPARATOR}", trimmed.to_uppercase())
    }
}

fn effective_key(prefix: &str, key: &str) -> String {
    let key = key.to_uppercase();
    if prefix.is_empty() || key.starts_with(prefix) {
        key
    } else {
        format!("{prefix}{key}")
    }
}

impl DotEnv {
    /// Create an empty registry reading `.env` from the current directory.
    ///
    /// Nothing is loaded until [`DotEnv::load`] is called.
    pub fn new() -> Self {
        Self::from_settings(Settings::default())
    }

    pub fn builder() -> DotEnvBuilder {
        DotEnvBuilder::new()
    }

    pub(super) fn from_settings(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
            cache: RwLock::new(None),
        }
    }

    /// Path of the config file used by `load` and `save`.
    pub fn config_file(&self) -> PathBuf {
        self.settings.read().config_file.clone()
    }

    pub fn set_config_file(&self, path: impl Into<PathBuf>) {
        self.settings.write().config_file = path.into();
    }

    /// Set the key prefix; `"app"` makes `get("port")` resolve `APP_PORT`.
    ///
    /// An empty prefix clears it.
    pub fn set_prefix(&self, prefix: &str) {
        self.settings.write().prefix = normalize_prefix(prefix);
    }

    /// The active prefix without its trailing separator.
    pub fn prefix(&self) -> String {
        self.settings
            .read()
            .prefix
            .trim_end_matches(PREFIX_SEPARATOR)
            .to_string()
    }

    /// Treat set-but-empty environment variables as values instead of
    /// falling back to the cache.
    pub fn allow_empty_env_vars(&self, allow: bool) {
        self.settings.write().allow_empty_env_vars = allow;
    }

    pub fn empty_env_vars_allowed(&self) -> bool {
        self.settings.read().allow_empty_env_vars
    }

    pub fn set_decoder<D: Decoder + 'static>(&self, decoder: D) {
        self.settings.write().decoder = Arc::new(decoder);
    }

    /// Upper-cased, prefixed form of `key` used for every comparison.
    pub fn effective_key(&self, key: &str) -> String {
        effective_key(&self.settings.read().prefix, key)
    }

    /// Read and decode the config file, then replace the cache.
    ///
    /// # Errors
    ///
    /// - `ConfigError::NotFound` if the file does not exist.
    /// - `ConfigError::Read` for other I/O failures.
    /// - `ConfigError::Decode` if the content is malformed.
    ///
    /// On error the previous cache is left untouched.
    pub fn load(&self) -> Result<(), ConfigError> {
        let (path, decoder) = {
            let settings = self.settings.read();
            (settings.config_file.clone(), Arc::clone(&settings.decoder))
        };

        let data = std::fs::read(&path).map_err(|e| ConfigError::from_read(path.clone(), e))?;
        let decoded = decoder
            .decode(&data)
            .map_err(|source| ConfigError::Decode {
                path: path.clone(),
                source,
            })?;

        let entries = decoded.len();
        let config: HashMap<String, Value> = decoded
            .into_iter()
            .map(|(key, value)| (key.to_uppercase(), Value::String(value)))
            .collect();

        *self.cache.write() = Some(config);

        tracing::debug!(path = %path.display(), entries, "Config loaded");
        Ok(())
    }

    /// Install `decoder` and then [`load`](DotEnv::load).
    pub fn load_with_decoder<D: Decoder + 'static>(&self, decoder: D) -> Result<(), ConfigError> {
        self.set_decoder(decoder);
        self.load()
    }

    /// Like [`load`](DotEnv::load), but a missing file is not an error.
    ///
    /// Returns `Ok(true)` when the file was loaded and `Ok(false)` when it
    /// does not exist.
    pub fn load_if_exists(&self) -> Result<bool, ConfigError> {
        match self.load() {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %self.config_file().display(), "Config file not found, skipping");
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Config file exists but could not be loaded");
                Err(e)
            }
        }
    }

    /// Resolve `key` and report which layer supplied the value.
    pub fn lookup(&self, key: &str) -> Option<(Value, Layer)> {
        if key.is_empty() {
            return None;
        }

        let (key, allow_empty) = {
            let settings = self.settings.read();
            (
                effective_key(&settings.prefix, key),
                settings.allow_empty_env_vars,
            )
        };

        if let Ok(value) = std::env::var(&key)
            && (!value.is_empty() || allow_empty)
        {
            return Some((Value::String(value), Layer::Environment));
        }

        self.cache
            .read()
            .as_ref()
            .and_then(|cache| cache.get(&key).cloned())
            .map(|value| (value, Layer::Cache))
    }

    /// Resolve `key`; `None` means no layer holds a value.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lookup(key).map(|(value, _)| value)
    }

    /// `true` if the environment or the cache holds `key`.
    pub fn is_set(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Insert or replace `key` in the cache.
    ///
    /// The value outranks the loaded file until the next `load`, but
    /// environment variables still take precedence.
    ///
    /// Keys that could not be read back from a saved file (empty, containing
    /// whitespace or `=`, or starting with `#`) are ignored.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        if key.is_empty() {
            return;
        }
        let key = self.effective_key(key);
        if !is_decodable_key(&key) {
            tracing::warn!("ignoring key that cannot be written to a dotenv file");
            return;
        }
        self.cache
            .write()
            .get_or_insert_with(HashMap::new)
            .insert(key, value.into());
    }

    /// Write the whole cache to the config file as `KEY=value` lines.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Write` if the file or its parent directory
    /// cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self.config_file();
        let content = encode_entries(self.cache.read().as_ref());
        write_config(&path, &content)
    }

    /// [`set`](DotEnv::set) followed by [`save`](DotEnv::save).
    pub fn write(&self, key: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        self.set(key, value);
        self.save()
    }

    /// Populate `target` from resolved values and declared defaults.
    pub fn unmarshal<T: Bind + ?Sized>(&self, target: &mut T) -> Result<(), ConfigError> {
        target.bind(&Binder::new(self))
    }

    /// Build a `T` from its `Default` and bind it.
    pub fn bind_new<T: Bind + Default>(&self) -> Result<T, ConfigError> {
        let mut target = T::default();
        self.unmarshal(&mut target)?;
        Ok(target)
    }
}

fn write_config(path: &Path, content: &str) -> Result<(), ConfigError> {
    write_atomic(path, content.as_bytes(), DEFAULT_FILE_MODE).map_err(|source| {
        ConfigError::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;

    tracing::debug!(path = %path.display(), "Config saved atomically");
    Ok(())
}
