//! Lab Desk Records
//!
//! Typed heterogeneous records for table views.
//!
//! # Core Concepts
//!
//! - [`Record`]: one row, an ordered map from field name to [`FieldValue`]
//! - [`FieldPath`]: parsed `dataIndex`, resolves nested values
//! - [`RecordSchema`]: declared field kinds, checked at table setup
//! - [`compare_values`]: type-aware ordering for sorting
//!
//! # Example
//!
//! ```rust
//! use lab_records::{FieldPath, FieldValue, Record};
//!
//! let record = Record::new().with("id", "ORD-001").with("price", 250.0);
//! let path: FieldPath = "price".parse().unwrap();
//! assert_eq!(record.resolve(&path), &FieldValue::Number(250.0));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod compare;
mod error;
mod path;
mod record;
mod schema;
mod value;

// Re-exports
pub use compare::{compare_values, SortClass};
pub use error::RecordError;
pub use path::{FieldPath, PathError};
pub use record::Record;
pub use schema::{FieldKind, RecordSchema};
pub use value::{FieldValue, DATE_FORMAT};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
