//! View state
//!
//! Query, sort and page position for one table instance.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// Opposite direction
    #[inline]
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// What subset of a table is currently shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    query: String,
    sort_key: Option<String>,
    sort_direction: SortDirection,
    page: usize,
    page_size: NonZeroUsize,
}

impl ViewState {
    /// Create state on page 1 with no query and no sort
    ///
    /// # Errors
    /// Returns [`TableError::ZeroPageSize`] when `page_size` is zero.
    pub fn new(page_size: usize) -> Result<Self, TableError> {
        let page_size = NonZeroUsize::new(page_size).ok_or(TableError::ZeroPageSize)?;
        Ok(Self::with_page_size(page_size))
    }

    /// Create state from an already validated page size
    #[must_use]
    pub fn with_page_size(page_size: NonZeroUsize) -> Self {
        Self {
            query: String::new(),
            sort_key: None,
            sort_direction: SortDirection::Ascending,
            page: 1,
            page_size,
        }
    }

    /// Builder: search query
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.set_query(query);
        self
    }

    /// Builder: sort by column key
    #[must_use]
    pub fn with_sort(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_key = Some(key.into());
        self.sort_direction = direction;
        self
    }

    /// Builder: page number (1-based)
    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.set_page(page);
        self
    }

    /// Replace the query; a changed query returns to page 1
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.page = 1;
        }
    }

    /// Move to a page; `0` is treated as page 1
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Clear sorting
    pub fn clear_sort(&mut self) {
        self.sort_key = None;
        self.sort_direction = SortDirection::Ascending;
    }

    /// Header-click behaviour: ascending, then descending, then unsorted
    ///
    /// Clicking a different column starts over at ascending.
    pub fn toggle_sort(&mut self, key: &str) {
        match (&self.sort_key, self.sort_direction) {
            (Some(current), SortDirection::Ascending) if current == key => {
                self.sort_direction = SortDirection::Descending;
            }
            (Some(current), SortDirection::Descending) if current == key => {
                self.clear_sort();
            }
            _ => {
                self.sort_key = Some(key.to_string());
                self.sort_direction = SortDirection::Ascending;
            }
        }
    }

    /// Current query
    #[inline]
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current sort key
    #[inline]
    #[must_use]
    pub fn sort_key(&self) -> Option<&str> {
        self.sort_key.as_deref()
    }

    /// Current sort direction
    #[inline]
    #[must_use]
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Requested page (1-based)
    #[inline]
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Rows per page
    #[inline]
    #[must_use]
    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }
}
