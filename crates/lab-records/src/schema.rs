//! Record schemas
//!
//! A [`RecordSchema`] declares the fields a table's records are expected to
//! carry. Columns are checked against it once at table setup, so a typo in a
//! `dataIndex` surfaces as a configuration error instead of a silently empty
//! column.

use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::compare::{is_numeric_text, parse_iso_datetime};
use crate::error::RecordError;
use crate::path::FieldPath;
use crate::record::Record;
use crate::value::FieldValue;

/// Declared kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text
    Text,
    /// Number or numeric string
    Number,
    /// Date or ISO date string
    Date,
    /// Boolean flag
    Bool,
    /// List of values
    List,
    /// Nested object with free-form content
    Object,
    /// Anything goes
    Any,
}

impl FieldKind {
    /// Check whether a value is acceptable for this kind
    ///
    /// Null is always accepted: optional fields are simply absent.
    #[must_use]
    pub fn accepts(self, value: &FieldValue) -> bool {
        match (self, value) {
            (_, FieldValue::Null)
            | (Self::Any, _)
            | (Self::Text, FieldValue::Text(_))
            | (Self::Number, FieldValue::Number(_))
            | (Self::Date, FieldValue::Date(_))
            | (Self::Bool, FieldValue::Bool(_))
            | (Self::List, FieldValue::List(_))
            | (Self::Object, FieldValue::Object(_)) => true,
            (Self::Number, FieldValue::Text(s)) => is_numeric_text(s),
            (Self::Date, FieldValue::Text(s)) => parse_iso_datetime(s).is_some(),
            _ => false,
        }
    }

    /// Whether paths may continue below a field of this kind
    #[inline]
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Object | Self::Any)
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Bool => "bool",
            Self::List => "list",
            Self::Object => "object",
            Self::Any => "any",
        };
        f.write_str(name)
    }
}

/// Declared field set for one table's records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSchema {
    fields: IndexMap<FieldPath, FieldKind>,
}

impl RecordSchema {
    /// Create empty schema
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field
    #[inline]
    #[must_use]
    pub fn field(mut self, path: FieldPath, kind: FieldKind) -> Self {
        self.fields.insert(path, kind);
        self
    }

    /// Declare a field from its dotted form
    ///
    /// # Errors
    /// Returns [`RecordError::Path`] for a malformed path.
    pub fn try_field(self, path: &str, kind: FieldKind) -> Result<Self, RecordError> {
        Ok(self.field(path.parse()?, kind))
    }

    /// Declared kind of a path, if declared
    #[inline]
    #[must_use]
    pub fn kind_of(&self, path: &FieldPath) -> Option<FieldKind> {
        self.fields.get(path).copied()
    }

    /// Check whether a path can resolve to something in records of this schema
    ///
    /// A path is known when it is declared, when it leads to declared
    /// nested fields, or when it descends into an open (object/any) field.
    #[must_use]
    pub fn knows(&self, path: &FieldPath) -> bool {
        self.fields.iter().any(|(declared, kind)| {
            declared == path
                || path.is_prefix_of(declared)
                || (kind.is_open() && declared.is_prefix_of(path))
        })
    }

    /// Number of declared fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no fields are declared
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate a record against the declared kinds
    ///
    /// # Errors
    /// Returns the first [`RecordError::KindMismatch`] found, in declaration order.
    pub fn validate(&self, record: &Record) -> Result<(), RecordError> {
        for (path, kind) in &self.fields {
            let value = record.resolve(path);
            if !kind.accepts(value) {
                return Err(RecordError::KindMismatch {
                    path: path.to_string(),
                    expected: *kind,
                    found: value.kind_name(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chemical_schema() -> RecordSchema {
        RecordSchema::new()
            .try_field("name", FieldKind::Text)
            .and_then(|s| s.try_field("stock", FieldKind::Number))
            .and_then(|s| s.try_field("supplier.name", FieldKind::Text))
            .and_then(|s| s.try_field("meta", FieldKind::Object))
            .unwrap()
    }

    #[test]
    fn knows_declared_prefix_and_open_paths() {
        let schema = chemical_schema();
        assert!(schema.knows(&"name".parse().unwrap()));
        assert!(schema.knows(&"supplier".parse().unwrap()));
        assert!(schema.knows(&"meta.batch".parse().unwrap()));
        assert!(!schema.knows(&"supplier.phone".parse().unwrap()));
        assert!(!schema.knows(&"price".parse().unwrap()));
    }

    #[test]
    fn validates_kinds_with_lenient_strings() {
        let schema = chemical_schema();
        let ok = Record::new().with("name", "NaCl").with("stock", "12");
        assert!(schema.validate(&ok).is_ok());

        let bad = Record::new().with("name", "NaCl").with("stock", "plenty");
        let err = schema.validate(&bad).unwrap_err();
        assert!(matches!(
            err,
            RecordError::KindMismatch { ref path, expected: FieldKind::Number, found: "text" } if path == "stock"
        ));
    }

    #[test]
    fn missing_fields_are_accepted() {
        assert!(chemical_schema().validate(&Record::new()).is_ok());
    }
}
