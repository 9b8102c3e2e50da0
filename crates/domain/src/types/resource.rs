//! Resource identifiers and opaque page records

use std::collections::HashSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{CUSTOM_FIELD_RESOURCE, DOCFIELD_RESOURCE, DOCTYPE_RESOURCE};
use crate::errors::{FraplinError, Result};

/// Name of a remote collection served under `/api/resource/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceType(String);

impl ResourceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn doc_type() -> Self {
        Self::new(DOCTYPE_RESOURCE)
    }

    pub fn doc_field() -> Self {
        Self::new(DOCFIELD_RESOURCE)
    }

    pub fn custom_field() -> Self {
        Self::new(CUSTOM_FIELD_RESOURCE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One JSON object from a `data` page, not yet decoded into a typed record.
///
/// Equality and hashing use the canonical JSON text of the object, so two
/// rows with identical content are the same record.
#[derive(Debug, Clone)]
pub struct RawRecord {
    fields: Map<String, Value>,
    identity: String,
}

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        let identity = Value::Object(fields.clone()).to_string();
        Self { fields, identity }
    }

    /// Build a record from an arbitrary JSON value, rejecting non-objects.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self::new(fields)),
            other => Err(FraplinError::Decode(format!(
                "expected a JSON object in page data, found {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The `name` identity field, when present and a string.
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Decode into a typed record; missing required fields are a
    /// [`FraplinError::Decode`].
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let name = self.name().map(str::to_owned);
        serde_json::from_value(Value::Object(self.fields)).map_err(|err| {
            FraplinError::Decode(match name {
                Some(name) => format!("record '{name}': {err}"),
                None => err.to_string(),
            })
        })
    }
}

impl PartialEq for RawRecord {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for RawRecord {}

impl std::hash::Hash for RawRecord {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Insertion-ordered set of raw records; duplicates collapse on insert.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<RawRecord>,
    seen: HashSet<String>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning `false` when an identical one is present.
    pub fn insert(&mut self, record: RawRecord) -> bool {
        if !self.seen.insert(record.identity.clone()) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, record: &RawRecord) -> bool {
        self.seen.contains(&record.identity)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawRecord> {
        self.records.iter()
    }

    pub fn into_vec(self) -> Vec<RawRecord> {
        self.records
    }
}

impl Extend<RawRecord> for RecordSet {
    fn extend<I: IntoIterator<Item = RawRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl FromIterator<RawRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = RawRecord>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for RecordSet {
    type Item = RawRecord;
    type IntoIter = std::vec::IntoIter<RawRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a RawRecord;
    type IntoIter = std::slice::Iter<'a, RawRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
