//! Source record type for documents read from the listings collection.
//!
//! Source documents are schema-optional: no two records are guaranteed to
//! share the same set of present fields, so the record is a mapping with
//! explicit presence checks rather than a fixed struct with nullable members.

use serde_json::{Map, Value};

/// One document as read from the source collection.
///
/// Wraps the raw field mapping and provides presence-aware accessors. Absence
/// of a field means "not set", never "set to null" - downstream consumers
/// must preserve that distinction.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord(Map<String, Value>);

impl SourceRecord {
    /// Create a record from a raw field mapping.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Get a field value if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Check whether a field is present.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of fields present on this record.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extract the record identifier from the `_id` field.
    ///
    /// Accepts the three shapes the source database produces:
    /// - a plain JSON string, taken verbatim;
    /// - an extended-JSON object id (`{"$oid": "..."}`), taking the hex string;
    /// - a JSON number, rendered in decimal.
    ///
    /// Returns `None` when `_id` is missing or has an unusable shape. The
    /// identifier is required for indexing, so callers treat `None` as a
    /// structural failure.
    pub fn identifier(&self) -> Option<String> {
        match self.0.get("_id")? {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get("$oid").and_then(Value::as_str).map(str::to_string),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Borrow the underlying field mapping.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for SourceRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Build a record from any JSON value, accepting only objects.
impl TryFrom<Value> for SourceRecord {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self::new(fields)),
            other => Err(other),
        }
    }
}
