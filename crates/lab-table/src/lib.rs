//! Lab Desk Tables
//!
//! Generic tabular view engine: search, sort and paginate over heterogeneous
//! record collections, with column-described rendering.
//!
//! # Core Concepts
//!
//! - [`Column`]: key, title, data index, sortability and an optional renderer
//! - [`ViewState`]: query, sort key/direction, page and page size
//! - [`TableEngine`]: validated column set running the projection pipeline
//! - [`TableView`]: one page of results plus filter/page totals
//!
//! # Example
//!
//! ```rust
//! use lab_records::Record;
//! use lab_table::{Column, SortDirection, TableEngine, ViewState};
//!
//! let engine = TableEngine::new(vec![
//!     Column::bound("price", "Price", "price").unwrap().sortable(),
//! ])
//! .unwrap();
//!
//! let records = vec![
//!     Record::new().with("price", 250.0),
//!     Record::new().with("price", 200.0),
//!     Record::new().with("price", 350.0),
//! ];
//! let state = ViewState::new(10)
//!     .unwrap()
//!     .with_sort("price", SortDirection::Descending);
//!
//! let view = engine.view(&records, &state);
//! let prices: Vec<String> = view.rows.iter().map(|r| engine.render_row(r)[0].text.clone()).collect();
//! assert_eq!(prices, vec!["350", "250", "200"]);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod column;
mod engine;
mod error;
mod state;

// Re-exports
pub use column::{Column, RenderFn};
pub use engine::{Cell, TableEngine, TableView};
pub use error::TableError;
pub use state::{SortDirection, ViewState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
