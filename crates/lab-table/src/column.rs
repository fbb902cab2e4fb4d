//! Column descriptors
//!
//! A [`Column`] says how to extract, sort and render one field of a record.
//! Columns are declared once per table and never change afterwards.

use std::fmt;
use std::sync::Arc;

use lab_records::{FieldPath, FieldValue, Record};

use crate::error::TableError;

/// Custom cell renderer: `(resolved value, whole record) -> display text`
pub type RenderFn = Arc<dyn Fn(&FieldValue, &Record) -> String + Send + Sync>;

static NULL: FieldValue = FieldValue::Null;

/// Declarative description of one table column
#[derive(Clone)]
pub struct Column {
    key: String,
    title: String,
    data_index: Option<FieldPath>,
    sortable: bool,
    searchable: bool,
    width: Option<u16>,
    render: Option<RenderFn>,
}

impl Column {
    /// Create a column that reads no field (e.g. an action column)
    #[must_use]
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            data_index: None,
            sortable: false,
            searchable: false,
            width: None,
            render: None,
        }
    }

    /// Create a column bound to a field path
    ///
    /// Bound columns are searchable by default.
    ///
    /// # Errors
    /// Returns [`TableError::InvalidDataIndex`] if `data_index` is malformed.
    pub fn bound(
        key: impl Into<String>,
        title: impl Into<String>,
        data_index: &str,
    ) -> Result<Self, TableError> {
        let key = key.into();
        let path = data_index
            .parse::<FieldPath>()
            .map_err(|source| TableError::InvalidDataIndex {
                column: key.clone(),
                source,
            })?;
        Ok(Self::new(key, title).with_data_index(path))
    }

    /// Bind to an already parsed field path
    #[must_use]
    pub fn with_data_index(mut self, path: FieldPath) -> Self {
        self.data_index = Some(path);
        self.searchable = true;
        self
    }

    /// Allow sorting by this column
    #[inline]
    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Exclude this column from search
    #[inline]
    #[must_use]
    pub fn not_searchable(mut self) -> Self {
        self.searchable = false;
        self
    }

    /// Layout hint
    #[inline]
    #[must_use]
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Custom renderer
    #[must_use]
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&FieldValue, &Record) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Unique key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display label
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Field path this column reads, if any
    #[inline]
    #[must_use]
    pub fn data_index(&self) -> Option<&FieldPath> {
        self.data_index.as_ref()
    }

    /// Layout hint, if any
    #[inline]
    #[must_use]
    pub fn width_hint(&self) -> Option<u16> {
        self.width
    }

    /// Whether the column can drive sorting
    #[inline]
    #[must_use]
    pub fn is_sortable(&self) -> bool {
        self.sortable && self.data_index.is_some()
    }

    /// Whether the column takes part in search
    #[inline]
    #[must_use]
    pub fn is_searchable(&self) -> bool {
        self.searchable && self.data_index.is_some()
    }

    /// Resolve this column's value in a record
    ///
    /// Unbound columns and missing fields yield [`FieldValue::Null`].
    #[must_use]
    pub fn resolve<'r>(&self, record: &'r Record) -> &'r FieldValue {
        match &self.data_index {
            Some(path) => record.resolve(path),
            None => &NULL,
        }
    }

    /// Render this column's cell for a record
    #[must_use]
    pub fn render_cell(&self, record: &Record) -> String {
        let value = self.resolve(record);
        match &self.render {
            Some(render) => render(value, record),
            None => value.to_string(),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("data_index", &self.data_index)
            .field("sortable", &self.sortable)
            .field("searchable", &self.searchable)
            .field("width", &self.width)
            .field("render", &self.render.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_columns_are_searchable_not_sortable() {
        let column = Column::bound("price", "Price", "price").unwrap();
        assert!(column.is_searchable());
        assert!(!column.is_sortable());
        assert!(column.sortable().is_sortable());
    }

    #[test]
    fn action_columns_never_search_or_sort() {
        let column = Column::new("actions", "Actions").sortable();
        assert!(!column.is_sortable());
        assert!(!column.is_searchable());
        assert_eq!(column.render_cell(&Record::new().with("x", 1.0)), "");
    }

    #[test]
    fn invalid_data_index_is_reported_with_column() {
        let err = Column::bound("due", "Due", "due-date").unwrap_err();
        assert!(matches!(err, TableError::InvalidDataIndex { ref column, .. } if column == "due"));
    }

    #[test]
    fn render_hook_sees_value_and_record() {
        let column = Column::bound("price", "Price", "price")
            .unwrap()
            .render(|value, record| {
                let currency = record.get("currency").map(ToString::to_string).unwrap_or_default();
                format!("{currency} {value}")
            });
        let record = Record::new().with("price", 250.0).with("currency", "INR");
        assert_eq!(column.render_cell(&record), "INR 250");
    }
}
