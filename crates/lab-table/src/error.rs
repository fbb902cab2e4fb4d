//! Table configuration errors
//!
//! Everything here is raised once, when a table is set up. Projection itself
//! never fails.

use lab_records::PathError;

/// Invalid table setup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Page size must be positive
    #[error("configuration error: page size must be greater than zero")]
    ZeroPageSize,

    /// Two columns share a key
    #[error("configuration error: duplicate column key '{0}'")]
    DuplicateColumn(String),

    /// Column's data index is not a valid field path
    #[error("configuration error: column '{column}' has invalid data index: {source}")]
    InvalidDataIndex {
        /// Column key
        column: String,
        /// Parse failure
        #[source]
        source: PathError,
    },

    /// Column's data index is not declared by the table's record schema
    #[error("configuration error: column '{column}' reads unknown field '{path}'")]
    UnknownField {
        /// Column key
        column: String,
        /// Offending path
        path: String,
    },
}
