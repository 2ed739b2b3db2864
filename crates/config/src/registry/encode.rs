//! Serialization of the cache into dotenv text.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

use crate::value::Value;

/// Render `cache` as sorted `KEY=value` lines that decode back to the same map.
pub(super) fn encode_entries(cache: Option<&HashMap<String, Value>>) -> String {
    let Some(cache) = cache else {
        return String::new();
    };

    let sorted: BTreeMap<&String, &Value> = cache.iter().collect();
    let mut out = String::new();
    for (key, value) in sorted {
        let _ = writeln!(out, "{key}={}", encode_value(&value.to_string()));
    }
    out
}

fn needs_quotes(value: &str) -> bool {
    value != value.trim()
        || value
            .chars()
            .any(|c| matches!(c, '#' | '"' | '\'' | '\\' | '\n' | '\r'))
}

fn encode_value(value: &str) -> String {
    if !needs_quotes(value) {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
