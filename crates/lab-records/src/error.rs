//! Error types for record handling

use crate::path::PathError;
use crate::schema::FieldKind;

/// Errors raised at the record boundary
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    /// Malformed field path
    #[error("invalid field path: {0}")]
    Path(#[from] PathError),

    /// JSON value was expected to be an object
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// Kind of JSON value found instead
        found: &'static str,
    },

    /// JSON value was expected to be an array of objects
    #[error("expected a JSON array, found {found}")]
    NotAnArray {
        /// Kind of JSON value found instead
        found: &'static str,
    },

    /// Field does not match the kind declared by the schema
    #[error("field '{path}' should be {expected}, found {found}")]
    KindMismatch {
        /// Offending field
        path: String,
        /// Declared kind
        expected: FieldKind,
        /// Kind actually present
        found: &'static str,
    },
}
