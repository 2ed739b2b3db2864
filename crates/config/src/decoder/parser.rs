//! Line-oriented state machine behind `DefaultDecoder`.
//!
//! Each physical line is either skipped (blank, comment, no separator), turned
//! into one entry, or opens a quoted block that swallows following lines until
//! the closing quote appears.

use std::collections::HashMap;

use crate::constants::EXPORT_MARKER;
use crate::error::DecodeError;

use super::unquote::{find_terminator, normalize_value, quoted_span_end};

/// Where a finished entry is routed.
#[derive(Debug)]
enum Key {
    /// Upper-cased key stored in the returned mapping.
    Plain(String),
    /// Key exported to the process environment, case preserved.
    Export(String),
}

/// A quoted value still waiting for its closing quote.
#[derive(Debug)]
struct PendingQuote {
    key: Key,
    quote: char,
    buffer: String,
    start_line: usize,
}

#[derive(Debug, Default)]
struct Parser {
    pending: Option<PendingQuote>,
    entries: HashMap<String, String>,
    /// Validated `export` entries, applied only once the whole document parsed.
    exports: Vec<(String, String, usize)>,
}

pub(super) fn parse_document(text: &str) -> Result<HashMap<String, String>, DecodeError> {
    let mut parser = Parser::default();
    for (index, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        parser.feed(index + 1, line)?;
    }
    parser.finish()
}

impl Parser {
    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), DecodeError> {
        if let Some(pending) = self.pending.take() {
            return self.continue_quote(pending, line);
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }

        let Some((raw_key, raw_value)) = trimmed
            .split_once('=')
            .or_else(|| trimmed.split_once(':'))
        else {
            tracing::trace!(line = line_no, "skipping line without separator");
            return Ok(());
        };

        let key = parse_key(raw_key, line_no)?;
        let value = raw_value.trim();

        let quote = value.chars().next().filter(|c| matches!(c, '"' | '\''));
        match quote {
            Some(quote) => match quoted_span_end(value, quote) {
                Some(end) => self.emit(key, normalize_value(&value[..=end]), line_no),
                None => {
                    self.pending = Some(PendingQuote {
                        key,
                        quote,
                        buffer: value.to_string(),
                        start_line: line_no,
                    });
                    Ok(())
                }
            },
            None => self.emit(key, normalize_value(value), line_no),
        }
    }

    fn continue_quote(&mut self, mut pending: PendingQuote, line: &str) -> Result<(), DecodeError> {
        pending.buffer.push('\n');
        match find_terminator(line, pending.quote) {
            Some(end) => {
                // Anything after the closing quote is a trailing comment.
                pending.buffer.push_str(&line[..=end]);
                let value = normalize_value(&pending.buffer);
                self.emit(pending.key, value, pending.start_line)
            }
            None => {
                pending.buffer.push_str(line);
                self.pending = Some(pending);
                Ok(())
            }
        }
    }

    fn emit(&mut self, key: Key, value: String, line_no: usize) -> Result<(), DecodeError> {
        match key {
            Key::Plain(key) => {
                self.entries.insert(key, value);
            }
            Key::Export(name) => {
                if name.contains(['\0', '=']) || value.contains('\0') {
                    return Err(DecodeError::InvalidExport { line: line_no });
                }
                self.exports.push((name, value, line_no));
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<HashMap<String, String>, DecodeError> {
        if let Some(pending) = self.pending {
            return Err(DecodeError::UnterminatedQuote {
                line: pending.start_line,
            });
        }

        for (name, value, line_no) in self.exports {
            // SAFETY: exported entries are documented to mutate the process
            // environment; callers that read the environment from other
            // threads while decoding accept that race.
            unsafe {
                std::env::set_var(&name, &value);
            }
            tracing::trace!(line = line_no, key = %name, "exported variable to environment");
        }
        Ok(self.entries)
    }
}

/// Whether `key` survives a `KEY=value` line written and decoded again.
pub(crate) fn is_decodable_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with(['#', '\u{feff}'])
        && !key.contains(|c: char| c.is_whitespace() || c == '=')
}

fn parse_key(raw_key: &str, line_no: usize) -> Result<Key, DecodeError> {
    let key = raw_key.trim();

    if let Some(rest) = key.strip_prefix(EXPORT_MARKER) {
        let name = rest.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(DecodeError::InvalidKey { line: line_no });
        }
        return Ok(Key::Export(name.to_string()));
    }

    if key.is_empty() || key.contains(char::is_whitespace) {
        return Err(DecodeError::InvalidKey { line: line_no });
    }
    Ok(Key::Plain(key.to_uppercase()))
}
