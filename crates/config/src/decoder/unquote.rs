//! Quote scanning and value normalization.

/// Byte index of the first unescaped `quote` in `s`.
pub(super) fn find_terminator(s: &str, quote: char) -> Option<usize> {
    let mut escaped = false;
    for (index, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Some(index);
        }
    }
    None
}

fn is_escaped(s: &str, index: usize) -> bool {
    let backslashes = s.as_bytes()[..index]
        .iter()
        .rev()
        .take_while(|b| **b == b'\\')
        .count();
    backslashes % 2 == 1
}

/// End of a quoted span opened by `value[0]`, if it closes on this line.
///
/// The first unescaped terminator closes the span when only whitespace or a
/// `#` comment follows it. Otherwise a value that ends with the opening quote
/// spans the whole right-hand side.
pub(super) fn quoted_span_end(value: &str, quote: char) -> Option<usize> {
    let first = find_terminator(&value[1..], quote).map(|index| index + 1);
    if let Some(end) = first {
        let rest = value[end + 1..].trim_start();
        if rest.is_empty() || rest.starts_with('#') {
            return Some(end);
        }
    }

    let last = value.len() - 1;
    if value.len() > 1 && value.ends_with(quote) && !is_escaped(value, last) {
        return Some(last);
    }
    first
}

/// Turn a delimited value span into the stored string.
pub(super) fn normalize_value(span: &str) -> String {
    let value = span.trim();
    let first = value.chars().next();
    match first {
        Some(quote @ ('"' | '\'')) if value.len() >= 2 && value.ends_with(quote) => {
            let inner = &value[1..value.len() - 1];
            if quote == '"' {
                unescape_double(inner)
            } else {
                unescape_single(inner)
            }
        }
        _ => strip_inline_comment(value),
    }
}

fn unescape_double(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn unescape_single(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&'\'') {
            continue;
        }
        out.push(c);
    }
    out
}

fn strip_inline_comment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'#') => {
                out.push('#');
                chars.next();
            }
            '#' => break,
            _ => out.push(c),
        }
    }
    out.trim_end().to_string()
}
