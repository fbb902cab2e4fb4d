//! Table engine
//!
//! Pure projection pipeline: search, then sort, then paginate. The engine
//! never mutates or owns records; callers re-run [`TableEngine::view`]
//! after every change to their collection.

use std::collections::HashSet;

use lab_records::compare::{compare_classes, SortClass};
use lab_records::{Record, RecordSchema};

use crate::column::Column;
use crate::error::TableError;
use crate::state::{SortDirection, ViewState};

/// One page of a projected table
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<'a> {
    /// Rows on the effective page, in display order
    pub rows: Vec<&'a Record>,
    /// Number of records that passed the search filter
    pub total_filtered: usize,
    /// Number of pages the filtered records span (0 when nothing matched)
    pub total_pages: usize,
    /// Page actually shown after clamping (1-based)
    pub page: usize,
    /// Zero-based position of the first row within the filtered sequence
    pub offset: usize,
}

impl TableView<'_> {
    /// Check if the page has no rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 1-based inclusive range of shown rows, e.g. `(21, 25)`
    #[must_use]
    pub fn shown_range(&self) -> Option<(usize, usize)> {
        if self.rows.is_empty() {
            None
        } else {
            Some((self.offset + 1, self.offset + self.rows.len()))
        }
    }
}

/// Rendered cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell<'c> {
    /// Column key
    pub key: &'c str,
    /// Display text
    pub text: String,
}

/// Column-described projection over record collections
#[derive(Debug, Clone)]
pub struct TableEngine {
    columns: Vec<Column>,
    schema: Option<RecordSchema>,
}

impl TableEngine {
    /// Create engine over a fixed column set
    ///
    /// # Errors
    /// Returns [`TableError::DuplicateColumn`] if two columns share a key.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        check_unique_keys(&columns)?;
        Ok(Self {
            columns,
            schema: None,
        })
    }

    /// Create engine whose columns are checked against a record schema
    ///
    /// # Errors
    /// - [`TableError::DuplicateColumn`] if two columns share a key
    /// - [`TableError::UnknownField`] if a column reads a field the schema lacks
    pub fn with_schema(columns: Vec<Column>, schema: RecordSchema) -> Result<Self, TableError> {
        check_unique_keys(&columns)?;
        for column in &columns {
            if let Some(path) = column.data_index() {
                if !schema.knows(path) {
                    return Err(TableError::UnknownField {
                        column: column.key().to_string(),
                        path: path.to_string(),
                    });
                }
            }
        }
        Ok(Self {
            columns,
            schema: Some(schema),
        })
    }

    /// Columns in display order
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Record schema, if the engine was set up with one
    #[inline]
    #[must_use]
    pub fn schema(&self) -> Option<&RecordSchema> {
        self.schema.as_ref()
    }

    /// Look up a column by key
    #[must_use]
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key() == key)
    }

    /// Column titles in display order
    #[must_use]
    pub fn header(&self) -> Vec<&str> {
        self.columns.iter().map(Column::title).collect()
    }

    /// Render one record as a row of cells
    #[must_use]
    pub fn render_row(&self, record: &Record) -> Vec<Cell<'_>> {
        self.columns
            .iter()
            .map(|column| Cell {
                key: column.key(),
                text: column.render_cell(record),
            })
            .collect()
    }

    /// Run the full pipeline
    #[must_use]
    pub fn view<'a>(&self, records: &'a [Record], state: &ViewState) -> TableView<'a> {
        let mut rows = self.search(records, state.query());
        self.sort(&mut rows, state.sort_key(), state.sort_direction());
        let view = paginate(rows, state);
        tracing::trace!(
            input = records.len(),
            filtered = view.total_filtered,
            page = view.page,
            total_pages = view.total_pages,
            "table view projected"
        );
        view
    }

    /// Search stage: keep records whose searchable values contain the query
    ///
    /// The query is trimmed and matched case-insensitively. An empty query keeps
    /// everything. Tables without searchable columns scan the whole record.
    #[must_use]
    pub fn search<'a>(&self, records: &'a [Record], query: &str) -> Vec<&'a Record> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return records.iter().collect();
        }

        let searchable: Vec<&Column> = self.columns.iter().filter(|c| c.is_searchable()).collect();
        records
            .iter()
            .filter(|record| {
                if searchable.is_empty() {
                    record.search_text().to_lowercase().contains(&needle)
                } else {
                    searchable.iter().any(|column| {
                        column
                            .resolve(record)
                            .search_text()
                            .to_lowercase()
                            .contains(&needle)
                    })
                }
            })
            .collect()
    }

    /// Sort stage: stable, type-aware, in place
    ///
    /// Unknown or non-sortable keys leave the order untouched.
    pub fn sort(&self, rows: &mut Vec<&Record>, key: Option<&str>, direction: SortDirection) {
        let Some(column) = key
            .and_then(|k| self.column(k))
            .filter(|c| c.is_sortable())
        else {
            return;
        };

        let mut keyed: Vec<(SortClass, &Record)> = rows
            .iter()
            .map(|record| (SortClass::of(column.resolve(record)), *record))
            .collect();

        // Descending flips the comparator rather than the output so ties keep input order.
        keyed.sort_by(|(a, _), (b, _)| match direction {
            SortDirection::Ascending => compare_classes(a, b),
            SortDirection::Descending => compare_classes(b, a),
        });

        *rows = keyed.into_iter().map(|(_, record)| record).collect();
    }
}

fn check_unique_keys(columns: &[Column]) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column.key()) {
            return Err(TableError::DuplicateColumn(column.key().to_string()));
        }
    }
    Ok(())
}

fn paginate<'a>(rows: Vec<&'a Record>, state: &ViewState) -> TableView<'a> {
    let total_filtered = rows.len();
    let page_size = state.page_size().get();
    let total_pages = total_filtered.div_ceil(page_size);
    let page = state.page().clamp(1, total_pages.max(1));
    let offset = (page - 1) * page_size;
    let end = (offset + page_size).min(total_filtered);

    let rows = if offset < total_filtered {
        rows[offset..end].to_vec()
    } else {
        Vec::new()
    };

    TableView {
        rows,
        total_filtered,
        total_pages,
        page,
        offset,
    }
}
