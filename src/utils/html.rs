//! HTML utility functions.
//!
//! - `escape_attr()` - entity escaping for attribute values
//! - `unescape()` - decode character references in attribute values
//! - `is_anchor()` - anchor tag name check
//! - `is_html_path()` - `.html` / `.htm` file check

use std::borrow::Cow;
use std::path::Path;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require escaping inside an attribute value.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape an attribute value.
///
/// Both quote kinds are escaped so the value is safe in either quoting style.
/// Uses `Cow` to avoid allocation when no escaping is needed.
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

// =============================================================================
// HTML Unescaping
// =============================================================================

/// Longest entity name considered (`&` to `;` exclusive).
const MAX_ENTITY_LEN: usize = 10;

/// Decode character references in an attribute value.
///
/// Only terminated references (`&amp;`, `&#39;`, `&#x2F;`) are decoded; a bare
/// `&` (as in `?a=1&b=2`) is kept literally.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('&') {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let decoded = after
            .find(';')
            .filter(|&end| end > 0 && end <= MAX_ENTITY_LEN)
            .and_then(|end| decode_entity(&after[..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                result.push(c);
                rest = &after[end + 1..];
            }
            None => {
                result.push('&');
                rest = after;
            }
        }
    }

    result.push_str(rest);
    Cow::Owned(result)
}

/// Decode a single entity body (text between `&` and `;`).
fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        s => {
            let num = s.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => num.parse().ok(),
            };
            code.and_then(char::from_u32)
        }
    }
}

// =============================================================================
// Element Classification
// =============================================================================

/// Check if a tag name is an anchor (`<a>`), case-insensitively.
#[inline]
pub fn is_anchor(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("a")
}

/// Check if a path names an HTML document by extension.
pub fn is_html_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
}

// =============================================================================
// Tests
// =============================================================================
