//! Records
//!
//! A [`Record`] is one row's worth of data: an insertion-ordered map from
//! field name to [`FieldValue`]. Records carry no fixed shape; columns and
//! schemas decide which fields matter.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::path::FieldPath;
use crate::value::FieldValue;

static NULL: FieldValue = FieldValue::Null;

/// One row of heterogeneous data
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    /// Create empty record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion
    #[inline]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a top-level field
    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Get a top-level field
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Resolve a path, yielding [`FieldValue::Null`] when any segment is missing
    ///
    /// Never fails: a record that lacks the field simply has an empty value there.
    #[must_use]
    pub fn resolve(&self, path: &FieldPath) -> &FieldValue {
        let mut segments = path.iter();
        let Some(first) = segments.next() else {
            return &NULL;
        };
        let mut current = match self.fields.get(first) {
            Some(value) => value,
            None => return &NULL,
        };
        for segment in segments {
            current = match current {
                FieldValue::Object(record) => match record.fields.get(segment) {
                    Some(value) => value,
                    None => return &NULL,
                },
                _ => return &NULL,
            };
        }
        current
    }

    /// Number of top-level fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate top-level fields in insertion order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every leaf value joined by spaces, used for whole-record search
    #[must_use]
    pub fn search_text(&self) -> String {
        self.fields
            .values()
            .filter(|v| !v.is_empty())
            .map(FieldValue::search_text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Convert a JSON object into a record
    ///
    /// # Errors
    /// Returns [`RecordError::NotAnObject`] when `value` is not a JSON object.
    pub fn from_json(value: serde_json::Value) -> Result<Self, RecordError> {
        match value {
            serde_json::Value::Object(map) => Ok(Self::from_json_map(map)),
            other => Err(RecordError::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }

    /// Convert a JSON array of objects into records
    ///
    /// # Errors
    /// Fails on the first element that is not an object, or when `value`
    /// is not an array.
    pub fn many_from_json(value: serde_json::Value) -> Result<Vec<Self>, RecordError> {
        match value {
            serde_json::Value::Array(items) => items.into_iter().map(Self::from_json).collect(),
            other => Err(RecordError::NotAnArray {
                found: json_kind(&other),
            }),
        }
    }

    pub(crate) fn from_json_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, FieldValue::from(v)))
                .collect(),
        }
    }
}

impl From<Record> for serde_json::Value {
    fn from(record: Record) -> Self {
        serde_json::Value::Object(
            record
                .fields
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::from(v)))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_nested_paths() {
        let record = Record::from_json(json!({
            "id": "ORD-001",
            "customer": {"name": "Acme Labs", "city": "Pune"}
        }))
        .unwrap();

        let path: FieldPath = "customer.name".parse().unwrap();
        assert_eq!(record.resolve(&path), &FieldValue::Text("Acme Labs".into()));
    }

    #[test]
    fn missing_path_resolves_to_null() {
        let record = Record::new().with("id", "X").with("price", 10.0);

        let missing: FieldPath = "customer.name".parse().unwrap();
        let through_scalar: FieldPath = "price.amount".parse().unwrap();
        assert_eq!(record.resolve(&missing), &FieldValue::Null);
        assert_eq!(record.resolve(&through_scalar), &FieldValue::Null);
    }

    #[test]
    fn rejects_non_object_json() {
        let err = Record::from_json(json!([1, 2])).unwrap_err();
        assert!(matches!(err, RecordError::NotAnObject { found: "array" }));

        let err = Record::many_from_json(json!({"a": 1})).unwrap_err();
        assert!(matches!(err, RecordError::NotAnArray { found: "object" }));
    }

    #[test]
    fn search_text_skips_empty_fields() {
        let record = Record::new()
            .with("name", "Sodium Chloride")
            .with("note", FieldValue::Null)
            .with("stock", 12.0);
        assert_eq!(record.search_text(), "Sodium Chloride 12");
    }

    #[test]
    fn round_trips_through_json() {
        let source = json!({"id": "C-1", "active": true, "tags": ["x"]});
        let record = Record::from_json(source.clone()).unwrap();
        let back: serde_json::Value = record.into();
        assert_eq!(back, source);
    }
}
