//! Struct binding: populate caller-declared fields from the registry.
//!
//! Responsibilities:
//! - Describe a field by its key and optional default (`Field`).
//! - Resolve each field through the registry precedence, falling back to the
//!   default, and cast the result onto the target (`Binder`).
//! - Recurse into nested structs that implement `Bind`.
//!
//! Does NOT handle:
//! - Deriving `Bind` implementations; callers write them by hand.
//!
//! Invariants / Assumptions:
//! - A field whose key resolves to an empty value and that has no default
//!   keeps its current value.
//! - The lenient `field` path never fails; `try_field` and `parse` report the
//!   offending key, never the value.

use std::fmt::Display;
use std::str::FromStr;

use super::dotenv::{DotEnv, Layer};
use crate::cast::Cast;
use crate::error::ConfigError;
use crate::value::Value;

/// A type whose fields can be populated from a [`DotEnv`].
///
/// ```
/// use envreg_config::{Bind, Binder, ConfigError, DotEnv, Field};
///
/// #[derive(Default)]
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// impl Bind for Server {
///     fn bind(&mut self, binder: &Binder<'_>) -> Result<(), ConfigError> {
///         binder.field(&mut self.host, Field::new("HOST").with_default("127.0.0.1"))?;
///         binder.field(&mut self.port, Field::new("PORT").with_default("8080"))?;
///         Ok(())
///     }
/// }
///
/// let env = DotEnv::builder().with_prefix("doctest_bind").build();
/// env.set("port", 9000);
///
/// let server: Server = env.bind_new()?;
/// assert_eq!(server.host, "127.0.0.1");
/// assert_eq!(server.port, 9000);
/// # Ok::<(), ConfigError>(())
/// ```
pub trait Bind {
    fn bind(&mut self, binder: &Binder<'_>) -> Result<(), ConfigError>;
}

/// Key and default for one bound field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    key: Option<String>,
    default: Option<String>,
}

impl Field {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            default: None,
        }
    }

    /// A field with no key: only the default is ever applied.
    pub fn default_only(value: impl Into<String>) -> Self {
        Self {
            key: None,
            default: Some(value.into()),
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn label(&self) -> String {
        self.key.clone().unwrap_or_else(|| "<default>".to_string())
    }
}

/// Resolves [`Field`]s against a registry on behalf of a [`Bind`] impl.
#[derive(Debug, Clone, Copy)]
pub struct Binder<'a> {
    registry: &'a DotEnv,
}

impl<'a> Binder<'a> {
    pub(super) fn new(registry: &'a DotEnv) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a DotEnv {
        self.registry
    }

    /// The raw value for `field` and the layer that supplied it.
    pub fn resolve(&self, field: &Field) -> Option<(String, Layer)> {
        if let Some(key) = field.key.as_deref()
            && let Some((value, layer)) = self.registry.lookup(key)
        {
            let raw = value.to_string();
            if !raw.is_empty() {
                return Some((raw, layer));
            }
        }

        field
            .default
            .as_ref()
            .filter(|default| !default.is_empty())
            .map(|default| (default.clone(), Layer::Default))
    }

    /// Lenient bind: an uncastable value becomes `T::default()`.
    pub fn field<T: Cast + Default>(&self, target: &mut T, field: Field) -> Result<(), ConfigError> {
        if let Some((raw, layer)) = self.resolve(&field) {
            tracing::trace!(field = %field.label(), ?layer, "Binding field");
            *target = T::cast(&Value::String(raw));
        }
        Ok(())
    }

    /// Strict bind: an uncastable value is a `ConfigError::Bind`.
    pub fn try_field<T: Cast>(&self, target: &mut T, field: Field) -> Result<(), ConfigError> {
        if let Some((raw, layer)) = self.resolve(&field) {
            tracing::trace!(field = %field.label(), ?layer, "Binding field");
            *target = T::try_cast(&Value::String(raw)).map_err(|e| ConfigError::Bind {
                key: field.label(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Bind through `FromStr`, for types the caster does not cover.
    pub fn parse<T>(&self, target: &mut T, field: Field) -> Result<(), ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        if let Some((raw, layer)) = self.resolve(&field) {
            tracing::trace!(field = %field.label(), ?layer, "Binding field");
            *target = raw.parse().map_err(|e: T::Err| ConfigError::Bind {
                key: field.label(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Bind a nested struct with the same registry.
    pub fn nested<T: Bind + ?Sized>(&self, target: &mut T) -> Result<(), ConfigError> {
        target.bind(self)
    }
}
