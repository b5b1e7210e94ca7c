use regex::Regex;
use std::sync::LazyLock;

/// Leading optionally-signed integer, after leading whitespace.
static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("Invalid leading integer regex"));

/// Parse the integer prefix of a free-text field.
///
/// Mirrors how browser form fields are read: `"342"` and `" 342 ilvl"` both
/// yield 342, while `""`, `"abc"` and values that overflow an `i64` yield `None`.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let captures = LEADING_INT.captures(text)?;
    captures[1].parse::<i64>().ok()
}

/// Parse a non-negative field, treating blank, invalid, negative and zero
/// values as "not provided".
pub fn parse_positive(text: &str) -> Option<u64> {
    parse_leading_int(text)
        .filter(|value| *value > 0)
        .and_then(|value| u64::try_from(value).ok())
}
