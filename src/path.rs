//! The filter path grammar.
//!
//! A path is consumed left-to-right, one segment per recursion step of the
//! filter matcher:
//!
//! - `Key` — `[^.[=]+` plus an optional trailing `.`; a literal object key
//!   or the `*` wildcard.
//! - `Slice` — `[n]`, `[]`, `[:]`, `[a:]`, `[:b]`, or `[a:b]`, plus an
//!   optional trailing `.`; a single index denotes the half-open range
//!   `[n, n+1)`, missing bounds default to the container's extent.
//! - `EqualityTest` — `==` followed by the remainder of the string, decoded
//!   as a tree literal by the generic decoder; only valid as the final
//!   segment.

use crate::parser;
use crate::tree::Node;
use once_cell::sync::Lazy;
use regex::Regex;

static KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^.\[=]+)\.?").unwrap());
static SLICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[(\d*)(?:(:?)(\d*))?\]\.?").unwrap());
static VALUE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^==(.+)$").unwrap());

/// Consumes a key segment. Returns the key and the remaining path, or `None`
/// when the path does not start with a key.
pub(crate) fn next_key(path: &str) -> Option<(&str, &str)> {
    let caps = KEY_RE.captures(path)?;
    let key = caps.get(1)?.as_str();
    let end = caps.get(0).map_or(0, |m| m.end());
    Some((key, &path[end..]))
}

/// Consumes a slice segment against a container of length `len`.
///
/// Returns `(lower, upper, rest, true)` on a match; `(0, 0, path, false)`
/// when the path does not start with a slice. The upper bound is not clamped
/// to `len`; callers compare indices against the half-open range directly.
pub(crate) fn next_slice(path: &str, len: usize) -> (usize, usize, &str, bool) {
    let caps = match SLICE_RE.captures(path) {
        Some(caps) => caps,
        None => return (0, 0, path, false),
    };
    let lower_digits = caps.get(1).map_or("", |m| m.as_str());
    let colon = caps.get(2).map_or("", |m| m.as_str());
    let upper_digits = caps.get(3).map_or("", |m| m.as_str());

    let lower = lower_digits.parse().unwrap_or(0);
    let upper = if upper_digits.is_empty() && (lower_digits.is_empty() || colon == ":") {
        len
    } else if upper_digits.is_empty() {
        lower + 1
    } else {
        upper_digits.parse().unwrap_or(0)
    };

    let end = caps.get(0).map_or(0, |m| m.end());
    (lower, upper, &path[end..], true)
}

/// Decodes the literal of an equality segment.
///
/// Returns `None` when the path does not start with `==`, or when the
/// literal cannot be decoded; an undecodable literal behaves as if no
/// equality segment were present.
pub(crate) fn equality_literal(path: &str) -> Option<Node> {
    let caps = VALUE_RE.captures(path)?;
    let literal = caps.get(1)?.as_str();
    parser::decode_str(literal).ok()
}
