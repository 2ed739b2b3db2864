//! Prioritized `.env` configuration registry.
//!
//! Values resolve through three layers, highest first:
//! 1. process environment variables
//! 2. a cache loaded from a dotenv file (or filled with `set`)
//! 3. declared defaults on bound structs
//!
//! ```no_run
//! use envreg_config::DotEnv;
//!
//! let env = DotEnv::builder().with_prefix("app").build();
//! env.load_if_exists()?;
//!
//! let port = env.get_u32("port"); // APP_PORT
//! let timeout = env.get_duration("timeout");
//! # let _ = (port, timeout);
//! # Ok::<(), envreg_config::ConfigError>(())
//! ```
//!
//! A process-wide registry is available through the free functions in
//! [`global`](mod@global).

pub mod cast;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod global;
mod registry;
pub mod value;
pub mod writer;

pub use cast::Cast;
pub use decoder::{Decoder, DefaultDecoder};
pub use error::{CastError, ConfigError, DecodeError};
pub use global::{GlobalGuard, global, replace_global};
pub use registry::{Bind, Binder, DotEnv, DotEnvBuilder, Field, Layer};
pub use value::Value;
