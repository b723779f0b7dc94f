//! Tag values and precedence-ordered merging.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A metadata tag value: text, a number, or a list of strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    /// Integer value (track and disc numbers).
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Plain text.
    Text(String),
    /// Multiple values, e.g. several genres.
    List(Vec<String>),
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Text(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Text(value)
    }
}

impl From<i64> for TagValue {
    fn from(value: i64) -> Self {
        TagValue::Integer(value)
    }
}

impl From<Vec<String>> for TagValue {
    fn from(value: Vec<String>) -> Self {
        TagValue::List(value)
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Integer(v) => write!(f, "{}", v),
            TagValue::Float(v) => write!(f, "{}", v),
            TagValue::Text(v) => f.write_str(v),
            TagValue::List(v) => f.write_str(&v.join("; ")),
        }
    }
}

/// Tag name to value. Ordered so serialized output is stable.
pub type TagMap = BTreeMap<String, TagValue>;

/// Merges tag sources in precedence order, lowest first.
///
/// Later sources win on key collision.
pub fn merge_tags<'a>(sources: impl IntoIterator<Item = &'a TagMap>) -> TagMap {
    let mut merged = TagMap::new();
    for source in sources {
        for (key, value) in source {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}
