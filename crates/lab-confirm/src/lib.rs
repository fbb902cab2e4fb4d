//! Lab Desk Confirmation Gate
//!
//! Single-flight confirmation for destructive and significant actions.
//!
//! # Core Concepts
//!
//! - [`ConfirmationGate`]: shared handle holding at most one active prompt
//! - [`Confirmation`]: caller's handle, awaited for a yes/no decision
//! - [`PendingPrompt`]: what the UI renders and answers
//! - [`GatePolicy`]: queue or reject overlapping requests
//!
//! # Example
//!
//! ```rust
//! use lab_confirm::{ConfirmDescriptor, ConfirmationGate};
//!
//! let gate = ConfirmationGate::default();
//! let request = gate
//!     .request_confirmation(ConfirmDescriptor::destructive("Delete", "Delete ORD-1?"))
//!     .unwrap();
//!
//! let prompt = gate.current().unwrap();
//! gate.confirm(prompt.id).unwrap();
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! assert!(runtime.block_on(request.decision()));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod gate;
mod types;

// Re-exports
pub use error::GateError;
pub use gate::{Confirmation, ConfirmationGate};
pub use types::{ConfirmDescriptor, ConfirmKind, GatePolicy, PendingPrompt, RequestId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
