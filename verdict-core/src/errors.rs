// Configuration errors and the accumulated field-error structures

use std::collections::BTreeMap;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use thiserror::Error;

/// Fatal configuration errors.
///
/// These are programming errors in the schema or target type, not payload
/// problems. They abort validation instead of accumulating in the field
/// error map.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("invalid regex pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("duplicate field `{0}` in schema")]
    DuplicateField(String),

    #[error("nested validation exceeded the maximum depth of {0} levels")]
    NestingTooDeep(usize),

    #[error("payload must be a JSON object or null")]
    PayloadNotObject,

    #[error("validated payload does not fit the target type: {0}")]
    Materialize(String),
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// One field's slot in the error map.
///
/// Serializes untagged so the wire shape stays a plain list of strings for
/// ordinary rules, a nested object for single nested fields, and an
/// index-keyed object for each-mode arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorEntry {
    /// Failing rule messages, in rule declaration order.
    Messages(Vec<String>),
    /// The error map of a single nested object.
    Nested(Errors),
    /// Per-index error maps for an each-mode nested array.
    ///
    /// A non-object element gets a synthetic map under a `"message"` key
    /// whose value is a one-element message list, so every index serializes
    /// as `{"field": ["..."]}` regardless of how it failed:
    /// `{"0": {"message": ["Invalid nested payload."]}}`.
    Items(BTreeMap<usize, Errors>),
}

impl ErrorEntry {
    pub fn as_messages(&self) -> Option<&[String]> {
        match self {
            ErrorEntry::Messages(messages) => Some(messages),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&Errors> {
        match self {
            ErrorEntry::Nested(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn as_items(&self) -> Option<&BTreeMap<usize, Errors>> {
        match self {
            ErrorEntry::Items(items) => Some(items),
            _ => None,
        }
    }
}

/// Field-addressed validation errors, kept in schema field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Errors {
    entries: Vec<(String, ErrorEntry)>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Set the entry for a field, replacing any previous one.
    pub fn insert(&mut self, field: impl Into<String>, entry: ErrorEntry) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = entry,
            None => self.entries.push((field, entry)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&ErrorEntry> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, entry)| entry)
    }

    /// Convenience accessor for a field's plain message list.
    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.get(field).and_then(ErrorEntry::as_messages)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ErrorEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for Errors {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}
