//! Lab Desk Workflow
//!
//! Order → Sample → Test work-item tree whose parent statuses are derived
//! from their children as analysts are assigned and tests are completed.
//!
//! # Core Concepts
//!
//! - [`WorkTree`]: immutable snapshot of every order
//! - [`TestStatus`], [`SampleStatus`], [`OrderStatus`]: closed status sets
//! - [`cascade`]: pure reducer deriving sample and order statuses
//! - [`Assignment`]: staff plus due date, validated all-or-nothing
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use lab_workflow::{Assignment, Order, Sample, SampleStatus, Test, WorkTree};
//!
//! let tree = WorkTree::from_orders([Order::new("ORD-1", "Acme").with_sample(
//!     Sample::new("S-1", "Soil")
//!         .with_test(Test::new("T-1", "pH"))
//!         .with_test(Test::new("T-2", "Moisture")),
//! )])
//! .unwrap();
//!
//! let due = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
//! let next = tree.assign("T-1", &Assignment::new("Priya", due)).unwrap();
//! assert_eq!(next.sample("S-1").unwrap().status(), SampleStatus::PartiallyAllocated);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod assignment;
pub mod cascade;
mod error;
mod ops;
mod status;
mod tree;

// Re-exports
pub use assignment::Assignment;
pub use error::{Action, RequiredField, WorkflowError};
pub use status::{OrderStatus, SampleStatus, TestStatus};
pub use tree::{Location, NodeKind, Order, Sample, Test, WorkTree};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
