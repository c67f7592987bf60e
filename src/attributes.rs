use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::{IdomError, IdomResult};
use crate::escape::escape_value;
use crate::value::Value;

/// Control parameters that are never serialized as attributes
pub const RESERVED_ATTRIBUTES: &[&str] = &["key", "ref"];

/// An ordered list of attribute name/value pairs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attrs(Vec<(String, Value)>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.push((name.into(), value.into()));
    }

    /// Build from a flat list of alternating names and values,
    /// e.g. `["id", "main", "class", "wide"]`.
    ///
    /// A trailing name without a value is dropped.
    pub fn from_flat<V>(items: &[V]) -> Self
    where
        V: Clone + Into<Value>,
    {
        if items.len() % 2 != 0 {
            tracing::warn!(
                len = items.len(),
                "odd-length attribute list, dropping trailing name"
            );
        }

        let pairs = items
            .chunks_exact(2)
            .map(|pair| {
                let name: Value = pair[0].clone().into();
                (name.to_string(), pair[1].clone().into())
            })
            .collect();
        Attrs(pairs)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<N, V, const K: usize> From<[(N, V); K]> for Attrs
where
    N: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: [(N, V); K]) -> Self {
        Attrs(
            pairs
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        )
    }
}

impl<N, V> FromIterator<(N, V)> for Attrs
where
    N: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Attrs(iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect())
    }
}

pub fn is_reserved(name: &str) -> bool {
    RESERVED_ATTRIBUTES.contains(&name)
}

/// Validate an attribute name against the HTML attribute-name grammar
pub fn validate_attribute_name(name: &str) -> IdomResult<()> {
    static ATTR_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = ATTR_NAME_REGEX
        .get_or_init(|| Regex::new(r#"^[^\s"'<>/=\x00-\x1f\x7f]+$"#).unwrap());

    if regex.is_match(name) {
        Ok(())
    } else {
        Err(IdomError::InvalidAttributeName {
            name: name.to_string(),
        })
    }
}

/// Validate an element tag name
pub fn validate_tag_name(tag: &str) -> IdomResult<()> {
    static TAG_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex =
        TAG_NAME_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.:\-]*$").unwrap());

    if regex.is_match(tag) {
        Ok(())
    } else {
        Err(IdomError::InvalidTagName {
            tag: tag.to_string(),
        })
    }
}

/// Append one attribute as ` name="value"`.
///
/// Reserved names are skipped silently; returns whether anything was written.
pub fn write_attribute(out: &mut String, name: &str, value: &Value) -> IdomResult<bool> {
    if is_reserved(name) {
        return Ok(false);
    }
    validate_attribute_name(name)?;

    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_value(value));
    out.push('"');
    Ok(true)
}

/// Append static attributes. Every entry is written regardless of its value.
pub fn write_static(out: &mut String, statics: Option<&Attrs>) -> IdomResult<bool> {
    let mut written = false;
    for (name, value) in statics.into_iter().flat_map(|a| a.iter()) {
        written |= write_attribute(out, name, value)?;
    }
    Ok(written)
}

/// Append dynamic attributes. Entries with a falsy value are omitted.
pub fn write_dynamic(out: &mut String, dynamics: &Attrs) -> IdomResult<bool> {
    let mut written = false;
    for (name, value) in dynamics.iter().filter(|(_, v)| v.is_truthy()) {
        written |= write_attribute(out, name, value)?;
    }
    Ok(written)
}

/// Serialize static then dynamic attributes into a string with one
/// leading space (or an empty string when nothing is included).
pub fn serialize_attributes(statics: Option<&Attrs>, dynamics: &Attrs) -> IdomResult<String> {
    let mut out = String::new();
    write_static(&mut out, statics)?;
    write_dynamic(&mut out, dynamics)?;
    Ok(out)
}
