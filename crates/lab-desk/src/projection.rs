//! Tree-to-table projection
//!
//! Flattens a [`WorkTree`] into one record collection per node kind and
//! provides the matching column sets, so the same [`TableEngine`] pipeline
//! serves work items and plain records alike.

use indexmap::IndexSet;
use lab_records::{FieldValue, Record};
use lab_table::{Column, TableEngine, TableError, TableView};
use lab_workflow::{NodeKind, WorkTree};

/// Rows for one node kind, in tree order
#[must_use]
pub fn rows(tree: &WorkTree, kind: NodeKind) -> Vec<Record> {
    match kind {
        NodeKind::Order => order_rows(tree),
        NodeKind::Sample => sample_rows(tree),
        NodeKind::Test => test_rows(tree),
    }
}

/// One row per order
#[must_use]
pub fn order_rows(tree: &WorkTree) -> Vec<Record> {
    tree.orders()
        .iter()
        .map(|order| {
            Record::new()
                .with("id", order.id())
                .with("customer", order.customer())
                .with("status", order.status().label())
                .with("samples", order.samples().len())
                .with("tests", order.tests().count())
                .with("approved", order.is_approved())
        })
        .collect()
}

/// One row per sample
#[must_use]
pub fn sample_rows(tree: &WorkTree) -> Vec<Record> {
    tree.orders()
        .iter()
        .flat_map(|order| {
            order.samples().iter().map(move |sample| {
                Record::new()
                    .with("id", sample.id())
                    .with("order", order.id())
                    .with("name", sample.name())
                    .with("status", sample.status().label())
                    .with("divisional_head", sample.assigned_divisional_head())
                    .with("due_date", sample.due_date())
                    .with("tests", sample.tests().len())
            })
        })
        .collect()
}

/// One row per test
#[must_use]
pub fn test_rows(tree: &WorkTree) -> Vec<Record> {
    tree.orders()
        .iter()
        .flat_map(|order| {
            order.samples().iter().flat_map(move |sample| {
                sample.tests().iter().map(move |test| {
                    Record::new()
                        .with("id", test.id())
                        .with("order", order.id())
                        .with("sample", sample.id())
                        .with("name", test.name())
                        .with("status", test.status().label())
                        .with("analyst", test.assigned_analyst())
                        .with("due_date", test.due_date())
                })
            })
        })
        .collect()
}

/// Table over [`rows`] of the given kind
///
/// # Errors
/// Only fails if the built-in column set is inconsistent.
pub fn table(kind: NodeKind) -> Result<TableEngine, TableError> {
    let columns = match kind {
        NodeKind::Order => vec![
            Column::bound("id", "Order", "id")?.sortable().width(12),
            Column::bound("customer", "Customer", "customer")?.sortable(),
            Column::bound("status", "Status", "status")?.sortable(),
            Column::bound("samples", "Samples", "samples")?.sortable(),
            Column::bound("tests", "Tests", "tests")?.sortable(),
            Column::bound("approved", "Approved", "approved")?
                .not_searchable()
                .render(|value, _| yes_no(matches!(value, FieldValue::Bool(true)))),
        ],
        NodeKind::Sample => vec![
            Column::bound("id", "Sample", "id")?.sortable().width(12),
            Column::bound("order", "Order", "order")?.sortable(),
            Column::bound("name", "Name", "name")?.sortable(),
            Column::bound("status", "Status", "status")?.sortable(),
            Column::bound("head", "Divisional Head", "divisional_head")?.sortable(),
            Column::bound("due", "Due", "due_date")?.sortable(),
            Column::bound("tests", "Tests", "tests")?.sortable(),
        ],
        NodeKind::Test => vec![
            Column::bound("id", "Test", "id")?.sortable().width(12),
            Column::bound("sample", "Sample", "sample")?.sortable(),
            Column::bound("name", "Name", "name")?.sortable(),
            Column::bound("status", "Status", "status")?.sortable(),
            Column::bound("analyst", "Analyst", "analyst")?.sortable(),
            Column::bound("due", "Due", "due_date")?.sortable(),
        ],
    };
    TableEngine::new(columns)
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "Yes" } else { "No" };
    text.to_string()
}

/// Sortable columns for every top-level field, in first-seen order
///
/// Fields whose names are not valid paths are skipped.
#[must_use]
pub fn columns_for(records: &[Record]) -> Vec<Column> {
    let keys: IndexSet<&str> = records.iter().flat_map(|r| r.iter().map(|(k, _)| k)).collect();
    keys.into_iter()
        .filter_map(|key| match Column::bound(key, key, key) {
            Ok(column) => Some(column.sortable()),
            Err(err) => {
                tracing::warn!(field = key, error = %err, "skipping field without a usable column");
                None
            }
        })
        .collect()
}

/// Plain-text rendering of one page, with a summary footer
#[must_use]
pub fn render_text(engine: &TableEngine, view: &TableView<'_>) -> String {
    let header = engine.header();
    let limits: Vec<Option<usize>> = engine
        .columns()
        .iter()
        .map(|c| c.width_hint().map(usize::from))
        .collect();

    let rows: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|record| {
            engine
                .render_row(record)
                .into_iter()
                .zip(&limits)
                .map(|(cell, limit)| clip(cell.text, *limit))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, header.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &rows {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }

    match view.shown_range() {
        Some((from, to)) => out.push_str(&format!(
            "Showing {from}-{to} of {} (page {}/{})\n",
            view.total_filtered, view.page, view.total_pages
        )),
        None => out.push_str("No matching records\n"),
    }
    out
}

fn push_line<'s>(out: &mut String, cells: impl Iterator<Item = &'s str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn clip(text: String, limit: Option<usize>) -> String {
    match limit {
        Some(limit) if limit > 1 && text.chars().count() > limit => {
            let mut clipped: String = text.chars().take(limit - 1).collect();
            clipped.push('~');
            clipped
        }
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_table::ViewState;
    use lab_test_utils::{numbered_records, sample_tree};
    use pretty_assertions::assert_eq;

    #[test]
    fn projects_every_kind() {
        let tree = sample_tree();
        assert_eq!(rows(&tree, NodeKind::Order).len(), 2);
        assert_eq!(rows(&tree, NodeKind::Sample).len(), 3);
        assert_eq!(rows(&tree, NodeKind::Test).len(), 5);

        let orders = order_rows(&tree);
        assert_eq!(orders[0].get("tests").map(ToString::to_string), Some("4".into()));
        assert_eq!(
            orders[1].get("status").map(ToString::to_string),
            Some("Completed".into())
        );
    }

    #[test]
    fn built_in_tables_are_consistent() {
        for kind in [NodeKind::Order, NodeKind::Sample, NodeKind::Test] {
            assert!(table(kind).is_ok(), "{kind}");
        }
    }

    #[test]
    fn test_rows_carry_parents() {
        let tests = test_rows(&sample_tree());
        let last = tests.last().unwrap();
        assert_eq!(last.get("order").map(ToString::to_string), Some("ORD-2".into()));
        assert_eq!(last.get("analyst").map(ToString::to_string), Some("Priya".into()));
    }

    #[test]
    fn columns_follow_first_seen_order() {
        let records = vec![
            Record::new().with("b", 1.0),
            Record::new().with("a", 1.0).with("b", 2.0).with("bad key", 3.0),
        ];
        let keys: Vec<String> = columns_for(&records).iter().map(|c| c.key().to_string()).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn renders_page_with_footer() {
        let records = numbered_records(3);
        let engine = TableEngine::new(columns_for(&records)).unwrap();
        let view = engine.view(&records, &ViewState::new(2).unwrap());

        let text = render_text(&engine, &view);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id  name");
        assert_eq!(lines[2], "1   Record 1");
        assert_eq!(lines.last().copied(), Some("Showing 1-2 of 3 (page 1/2)"));
    }

    #[test]
    fn renders_empty_view() {
        let records = numbered_records(3);
        let engine = TableEngine::new(columns_for(&records)).unwrap();
        let view = engine.view(&records, &ViewState::new(2).unwrap().with_query("nothing"));
        assert!(render_text(&engine, &view).ends_with("No matching records\n"));
    }

    #[test]
    fn clips_to_width_hint() {
        assert_eq!(clip("ORD-2024-000123".into(), Some(8)), "ORD-202~");
        assert_eq!(clip("short".into(), Some(8)), "short");
    }
}
