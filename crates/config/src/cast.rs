//! Value caster: best-effort coercion of cached values into Rust types.
//!
//! Responsibilities:
//! - Convert a `Value` into strings, booleans, integers, floats, durations,
//!   timestamps and lists through the `Cast` trait.
//! - Offer a lenient path (`Cast::cast`, zero value on failure) and a strict
//!   path (`Cast::try_cast`, `CastError` on failure).
//! - Parse and format duration strings (`300ms`, `1h30m0s`) and byte sizes (`12 MB`).
//!
//! Does NOT handle:
//! - Key resolution or precedence (see `registry`).
//!
//! Invariants:
//! - Lenient casts never fail; they fall back to `Default::default()`.
//! - Durations are non-negative; a bare number is a count of nanoseconds.
//! - An empty string casts to an empty list, not a list with one empty element.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::constants::{GIB, KIB, MIB};
use crate::error::CastError;
use crate::value::Value;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Conversion from a cached `Value` into a concrete type.
pub trait Cast: Sized {
    /// Strict conversion that reports why a value could not be cast.
    fn try_cast(value: &Value) -> Result<Self, CastError>;

    /// Lenient conversion: the type's zero value when the cast fails.
    fn cast(value: &Value) -> Self
    where
        Self: Default,
    {
        Self::try_cast(value).unwrap_or_default()
    }
}

impl Cast for String {
    fn try_cast(value: &Value) -> Result<Self, CastError> {
        Ok(value.to_string())
    }
}

impl Cast for bool {
    fn try_cast(value: &Value) -> Result<Self, CastError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Int(i) => Ok(*i != 0),
            Value::Uint(u) => Ok(*u != 0),
            Value::Float(x) => Ok(*x != 0.0),
            Value::String(s) => parse_bool(s),
            _ => Err(CastError::invalid("bool", "unsupported value kind")),
        }
    }
}

fn parse_bool(raw: &str) -> Result<bool, CastError> {
    match raw.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(CastError::invalid("bool", "expected true or false")),
    }
}

/// Strip a trailing all-zero fraction so `"10.0"` parses as an integer.
fn trim_zero_decimal(s: &str) -> &str {
    match s.rsplit_once('.') {
        Some((int, frac)) if !frac.is_empty() && frac.bytes().all(|b| b == b'0') => int,
        _ => s,
    }
}

fn split_radix(digits: &str) -> (u32, &str) {
    let prefixed = |lower: &str, upper: &str| {
        digits
            .strip_prefix(lower)
            .or_else(|| digits.strip_prefix(upper))
    };
    if let Some(rest) = prefixed("0x", "0X") {
        (16, rest)
    } else if let Some(rest) = prefixed("0o", "0O") {
        (8, rest)
    } else if let Some(rest) = prefixed("0b", "0B") {
        (2, rest)
    } else {
        (10, digits)
    }
}

fn parse_magnitude(digits: &str, target: &'static str) -> Result<u64, CastError> {
    let (radix, digits) = split_radix(digits);
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(CastError::invalid(target, "not a number"));
    }
    u64::from_str_radix(digits, radix).map_err(|_| CastError::Overflow { target })
}

/// Parse a signed integer with optional sign, radix prefix and zero fraction.
pub fn parse_i64(raw: &str) -> Result<i64, CastError> {
    let s = trim_zero_decimal(raw.trim());
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let magnitude = parse_magnitude(digits, "i64")?;
    if negative {
        if magnitude > i64::MAX as u64 + 1 {
            return Err(CastError::Overflow { target: "i64" });
        }
        Ok((magnitude as i64).wrapping_neg())
    } else {
        i64::try_from(magnitude).map_err(|_| CastError::Overflow { target: "i64" })
    }
}

/// Parse an unsigned integer; negative input is rejected.
pub fn parse_u64(raw: &str) -> Result<u64, CastError> {
    let s = trim_zero_decimal(raw.trim());
    if s.starts_with('-') {
        return Err(CastError::invalid("u64", "negative value"));
    }
    parse_magnitude(s.strip_prefix('+').unwrap_or(s), "u64")
}

fn float_to_i64(x: f64) -> Result<i64, CastError> {
    if !x.is_finite() || x < i64::MIN as f64 || x >= i64::MAX as f64 {
        return Err(CastError::Overflow { target: "i64" });
    }
    Ok(x.trunc() as i64)
}

fn value_to_i64(value: &Value) -> Result<i64, CastError> {
    match value {
        Value::Int(i) => Ok(*i),
        Value::Uint(u) => i64::try_from(*u).map_err(|_| CastError::Overflow { target: "i64" }),
        Value::Float(x) => float_to_i64(*x),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::String(s) => parse_i64(s),
        _ => Err(CastError::invalid("i64", "unsupported value kind")),
    }
}

fn value_to_u64(value: &Value) -> Result<u64, CastError> {
    match value {
        Value::Uint(u) => Ok(*u),
        Value::Int(i) => u64::try_from(*i).map_err(|_| CastError::invalid("u64", "negative value")),
        Value::Float(x) if x.is_finite() && *x >= 0.0 && *x < u64::MAX as f64 => {
            Ok(x.trunc() as u64)
        }
        Value::Float(_) => Err(CastError::Overflow { target: "u64" }),
        Value::Bool(b) => Ok(u64::from(*b)),
        Value::String(s) => parse_u64(s),
        _ => Err(CastError::invalid("u64", "unsupported value kind")),
    }
}

macro_rules! cast_signed {
    ($($t:ty),*) => {
        $(impl Cast for $t {
            fn try_cast(value: &Value) -> Result<Self, CastError> {
                let wide = value_to_i64(value)?;
                <$t>::try_from(wide).map_err(|_| CastError::Overflow { target: stringify!($t) })
            }
        })*
    };
}

macro_rules! cast_unsigned {
    ($($t:ty),*) => {
        $(impl Cast for $t {
            fn try_cast(value: &Value) -> Result<Self, CastError> {
                let wide = value_to_u64(value)?;
                <$t>::try_from(wide).map_err(|_| CastError::Overflow { target: stringify!($t) })
            }
        })*
    };
}

cast_signed!(i8, i16, i32, i64, isize);
cast_unsigned!(u8, u16, u32, u64, usize);

impl Cast for f64 {
    fn try_cast(value: &Value) -> Result<Self, CastError> {
        match value {
            Value::Float(x) => Ok(*x),
            Value::Int(i) => Ok(*i as f64),
            Value::Uint(u) => Ok(*u as f64),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| CastError::invalid("f64", "not a number")),
            _ => Err(CastError::invalid("f64", "unsupported value kind")),
        }
    }
}

impl Cast for f32 {
    fn try_cast(value: &Value) -> Result<Self, CastError> {
        f64::try_cast(value).map(|x| x as f32)
    }
}

impl Cast for Duration {
    fn try_cast(value: &Value) -> Result<Self, CastError> {
        match value {
            Value::Duration(d) => Ok(*d),
            Value::Int(i) => u64::try_from(*i)
                .map(Duration::from_nanos)
                .map_err(|_| CastError::invalid("duration", "negative durations are not supported")),
            Value::Uint(u) => Ok(Duration::from_nanos(*u)),
            Value::Float(x) if x.is_finite() && *x >= 0.0 && *x < u64::MAX as f64 => {
                Ok(Duration::from_nanos(*x as u64))
            }
            Value::String(s) => parse_duration(s),
            _ => Err(CastError::invalid("duration", "unsupported value kind")),
        }
    }
}

/// Parse a duration such as `300ms`, `1.5h` or `2h45m`.
///
/// Accepted units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A string
/// without any unit letter is read as nanoseconds.
pub fn parse_duration(raw: &str) -> Result<Duration, CastError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(CastError::invalid("duration", "empty string"));
    }
    if s.contains(['n', 's', 'u', 'µ', 'μ', 'm', 'h']) {
        parse_unit_duration(s)
    } else {
        parse_unit_duration(&format!("{s}ns"))
    }
}

fn unit_nanos(unit: &str) -> Result<u128, CastError> {
    match unit {
        "ns" => Ok(1),
        "us" | "µs" | "μs" => Ok(1_000),
        "ms" => Ok(1_000_000),
        "s" => Ok(NANOS_PER_SEC),
        "m" => Ok(60 * NANOS_PER_SEC),
        "h" => Ok(3600 * NANOS_PER_SEC),
        "" => Err(CastError::invalid("duration", "missing unit")),
        _ => Err(CastError::invalid("duration", "unknown unit")),
    }
}

fn parse_unit_duration(s: &str) -> Result<Duration, CastError> {
    let mut rest = s.strip_prefix('+').unwrap_or(s);
    if rest.starts_with('-') {
        return Err(CastError::invalid(
            "duration",
            "negative durations are not supported",
        ));
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }

    let is_number = |c: char| c.is_ascii_digit() || c == '.';
    let mut total: u128 = 0;
    while !rest.is_empty() {
        let number_end = rest.find(|c: char| !is_number(c)).unwrap_or(rest.len());
        let number = &rest[..number_end];
        rest = &rest[number_end..];
        let unit_end = rest.find(is_number).unwrap_or(rest.len());
        let unit = unit_nanos(&rest[..unit_end])?;
        rest = &rest[unit_end..];

        let (int_part, frac_part) = number.split_once('.').unwrap_or((number, ""));
        if (int_part.is_empty() && frac_part.is_empty()) || frac_part.contains('.') {
            return Err(CastError::invalid("duration", "expected a number before the unit"));
        }
        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| CastError::Overflow { target: "duration" })?
        };
        let mut fraction: u128 = 0;
        if !frac_part.is_empty() {
            let digits = &frac_part[..frac_part.len().min(18)];
            let numerator: u128 = digits
                .parse()
                .map_err(|_| CastError::invalid("duration", "invalid fraction"))?;
            fraction = numerator * unit / 10u128.pow(digits.len() as u32);
        }
        total = whole
            .checked_mul(unit)
            .and_then(|n| n.checked_add(fraction))
            .and_then(|n| n.checked_add(total))
            .ok_or(CastError::Overflow { target: "duration" })?;
    }

    let secs =
        u64::try_from(total / NANOS_PER_SEC).map_err(|_| CastError::Overflow { target: "duration" })?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

fn format_fraction(value: u128, scale: u128) -> String {
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let width = scale.to_string().len() - 1;
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Render a duration in the unit syntax accepted by [`parse_duration`].
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < NANOS_PER_SEC {
        let (unit, scale) = if nanos >= 1_000_000 {
            ("ms", 1_000_000)
        } else if nanos >= 1_000 {
            ("µs", 1_000)
        } else {
            ("ns", 1)
        };
        return format!("{}{unit}", format_fraction(nanos, scale));
    }

    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = u128::from(total_secs % 60) * NANOS_PER_SEC + u128::from(d.subsec_nanos());

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&format_fraction(seconds, NANOS_PER_SEC));
    out.push('s');
    out
}

impl Cast for DateTime<Utc> {
    fn try_cast(value: &Value) -> Result<Self, CastError> {
        match value {
            Value::Time(t) => Ok(*t),
            Value::Int(secs) => from_unix(*secs),
            Value::Uint(secs) => i64::try_from(*secs)
                .map_err(|_| CastError::Overflow { target: "time" })
                .and_then(from_unix),
            Value::String(s) => parse_time(s),
            _ => Err(CastError::invalid("time", "unsupported value kind")),
        }
    }
}

fn from_unix(secs: i64) -> Result<DateTime<Utc>, CastError> {
    DateTime::from_timestamp(secs, 0).ok_or(CastError::Overflow { target: "time" })
}

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M:%S%.f%:z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a timestamp in one of the common textual layouts, or Unix seconds.
pub fn parse_time(raw: &str) -> Result<DateTime<Utc>, CastError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(CastError::invalid("time", "empty string"));
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }
    if let Ok(t) = DateTime::parse_from_rfc2822(s) {
        return Ok(t.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(t) = DateTime::parse_from_str(s, format) {
            return Ok(t.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(t.and_utc());
        }
    }
    if let Some(t) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(t.and_utc());
    }
    match s.parse::<i64>() {
        Ok(secs) => from_unix(secs),
        Err(_) => Err(CastError::invalid("time", "unrecognized time format")),
    }
}

/// Split a list value: strip one `[`/`]` pair, split on `,`, trim elements.
///
/// There is no escape for a literal comma inside an element.
pub fn split_list(raw: &str) -> Vec<String> {
    let s = raw.trim();
    let s = s.strip_prefix('[').unwrap_or(s);
    let s = s.strip_suffix(']').unwrap_or(s);
    if s.trim().is_empty() {
        return Vec::new();
    }
    s.split(',').map(|item| item.trim().to_string()).collect()
}

impl Cast for Vec<String> {
    fn try_cast(value: &Value) -> Result<Self, CastError> {
        match value {
            Value::List(items) => Ok(items.clone()),
            Value::String(s) => Ok(split_list(s)),
            other => Ok(vec![other.to_string()]),
        }
    }
}

impl Cast for Vec<i64> {
    fn try_cast(value: &Value) -> Result<Self, CastError> {
        match value {
            Value::List(items) => items.iter().map(|item| parse_i64(item)).collect(),
            Value::String(s) => split_list(s).iter().map(|item| parse_i64(item)).collect(),
            other => value_to_i64(other).map(|i| vec![i]),
        }
    }
}

/// Convert strings like `1GB`, `12 mb` or `512` into a number of bytes.
///
/// Unparseable or negative sizes yield 0, as does a product that overflows.
pub fn parse_size_in_bytes(raw: &str) -> u64 {
    let mut size = raw.trim();
    let mut multiplier = 1;

    let bytes = size.as_bytes();
    if bytes.len() > 2 && matches!(bytes[bytes.len() - 1], b'b' | b'B') {
        let (unit, cut) = match bytes[bytes.len() - 2].to_ascii_lowercase() {
            b'k' => (KIB, 2),
            b'm' => (MIB, 2),
            b'g' => (GIB, 2),
            _ => (1, 1),
        };
        multiplier = unit;
        size = size[..size.len() - cut].trim();
    }

    let count = parse_i64(size).unwrap_or(0).max(0) as u64;
    count.checked_mul(multiplier).unwrap_or(0)
}
