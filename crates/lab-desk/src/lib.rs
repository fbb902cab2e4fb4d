//! Lab Desk
//!
//! Orchestrates the laboratory work desk:
//! - Holds the order/sample/test tree as immutable snapshots with undo/redo
//! - Routes delete and reopen through the confirmation gate
//! - Refuses changes to nodes an outstanding confirmation is about
//! - Projects the tree into tables for the view engine
//!
//! # Example
//!
//! ```rust
//! use lab_desk::{Desk, DeskConfig, Outcome};
//! use lab_workflow::{Order, Sample, Test};
//!
//! # async fn example() -> Result<(), lab_desk::DeskError> {
//! let desk = Desk::new(DeskConfig::default())?;
//! desk.register_order(
//!     Order::new("ORD-1", "Acme").with_sample(Sample::new("S-1", "Water").with_test(Test::new("T-1", "pH"))),
//! )?;
//!
//! let delete = desk.delete("S-1");
//! let answer = async {
//!     tokio::task::yield_now().await;
//!     let prompt = desk.gate().current().expect("prompt shown");
//!     desk.gate().confirm(prompt.id)
//! };
//! let (outcome, answered) = tokio::join!(delete, answer);
//! answered?;
//! assert_eq!(outcome?, Outcome::Applied);
//! assert!(!desk.tree().contains("S-1"));
//! # Ok(())
//! # }
//! # tokio::runtime::Runtime::new().unwrap().block_on(example()).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
mod desk;
pub mod error;
mod history;
pub mod projection;

// Re-exports
pub use config::DeskConfig;
pub use desk::{Desk, Outcome};
pub use error::{ConfigError, DeskError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
