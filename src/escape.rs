//! HTML escaping for text content and attribute values.
//!
//! Both functions borrow the input when nothing needs replacing, so the
//! common case of plain text costs no allocation.

use std::borrow::Cow;

use crate::value::Value;

/// Escapes a string for use as element text content.
///
/// Replaces `&`, `<` and `>` so the text cannot open or close a tag.
pub fn escape_text(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>']) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Escapes a string for use inside a double-quoted attribute value.
///
/// Quotes are replaced along with `&`, `<` and `>`, so a value can never
/// terminate the attribute or inject a new one.
pub fn escape_attribute_value(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Converts any [`Value`] to its string form and escapes it as an attribute value.
pub fn escape_value(value: &Value) -> String {
    escape_attribute_value(&value.to_string()).into_owned()
}
