//! Canonical and remote record shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A typed value held by a canonical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Trimmed text value.
    Text(String),
    /// Numeric value (geocoded coordinates).
    Number(f64),
    /// Ordered list of record identifiers (relation field).
    List(Vec<String>),
}

impl FieldValue {
    /// Returns the text content when this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the identifier list when this is a `List` value.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Text(value) => Value::String(value.clone()),
            Self::Number(value) => serde_json::Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::List(values) => {
                Value::Array(values.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// A normalized record keyed by canonical field name.
///
/// Only fields named by the collection's allow-list ever appear here;
/// unrecognized source columns are not carried forward. Missing optional
/// fields are simply absent rather than mapped to null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl CanonicalRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a canonical field value.
    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    /// Returns the value of a canonical field, if present.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Returns the text value of a canonical field, if present.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Returns the identifier list of a canonical field, if present.
    pub fn list(&self, field: &str) -> Option<&[String]> {
        self.get(field).and_then(FieldValue::as_list)
    }

    /// Builds the full JSON payload for a create call.
    pub fn payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        for (name, value) in &self.fields {
            payload.insert(name.clone(), value.to_json());
        }
        payload
    }
}

/// A read-only snapshot of a record as last read from the store.
///
/// Owned by the store; the pipeline holds it only within one reconciler
/// invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteRecord {
    /// Store-assigned (or caller-assigned) record identifier.
    pub id: String,
    /// Remaining record fields as returned by the store.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RemoteRecord {
    /// Reads a relation-list field, tolerating both array and single-value
    /// shapes. Null or absent fields yield an empty list.
    pub fn relation_list(&self, field: &str) -> Vec<String> {
        match self.fields.get(field) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(|value| value.as_str())
                .filter(|value| !value.trim().is_empty())
                .map(str::to_string)
                .collect(),
            Some(Value::String(value)) if !value.trim().is_empty() => {
                vec![value.clone()]
            }
            _ => Vec::new(),
        }
    }
}
