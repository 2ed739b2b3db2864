//! Decoder for dotenv-format documents.
//!
//! Responsibilities:
//! - Define the pluggable `Decoder` trait used by the registry.
//! - Provide `DefaultDecoder`, which strips a UTF-8 BOM, validates UTF-8 and
//!   runs the line-oriented parser.
//!
//! Does NOT handle:
//! - Reading files or swapping the registry cache (see `registry`).
//! - Type coercion of decoded strings (see `cast.rs`).
//!
//! Invariants / Assumptions:
//! - Output keys are upper-cased; the last occurrence of a key wins.
//! - `export KEY=value` entries set the process environment and are NOT returned.
//! - Decoding is all-or-nothing: any error discards the partial mapping and
//!   no `export` entry reaches the environment.
//! - Lines without a `=` or `:` separator are skipped silently.
//! - Exported variables mutate process-global state without extra
//!   synchronization; concurrent decodes or environment readers may race.

mod parser;
mod unquote;

pub(crate) use parser::is_decodable_key;


use std::collections::HashMap;
use std::fmt;

use crate::constants::UTF8_BOM;
use crate::error::DecodeError;

/// Decodes the raw contents of a config file into a flat key/value mapping.
pub trait Decoder: Send + Sync + fmt::Debug {
    fn decode(&self, data: &[u8]) -> Result<HashMap<String, String>, DecodeError>;
}

/// The built-in dotenv decoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDecoder;

impl Decoder for DefaultDecoder {
    fn decode(&self, data: &[u8]) -> Result<HashMap<String, String>, DecodeError> {
        let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
        let text = std::str::from_utf8(data).map_err(|e| DecodeError::InvalidUtf8 {
            valid_up_to: e.valid_up_to(),
        })?;
        parser::parse_document(text)
    }
}
