//! Conversions between row-oriented and column-oriented tables.
//!
//! Converters never reorder, deduplicate or filter. Index `i` in every column
//! of a [`ColumnStore`] refers to row `i`.

use indexmap::IndexMap;
use itertools::Itertools;

use crate::data::{CellValue, ColumnSlug, Row};

pub type Column = Vec<Option<CellValue>>;

/// Slug to column, in insertion order.
pub type ColumnStore = IndexMap<ColumnSlug, Column>;

/// Expands a column store into rows.
///
/// The first column's length decides the row count. Cells past the end of a
/// shorter column are left undefined rather than treated as an error.
pub fn column_store_to_rows(store: &ColumnStore) -> Vec<Row> {
    let Some(first) = store.values().next() else {
        return Vec::new();
    };
    (0..first.len())
        .map(|index| make_row_from_column_store(index, store))
        .collect()
}

pub fn make_row_from_column_store(row_index: usize, store: &ColumnStore) -> Row {
    store
        .iter()
        .filter_map(|(slug, column)| {
            column
                .get(row_index)
                .and_then(Option::as_ref)
                .map(|value| (slug.clone(), value.clone()))
        })
        .collect()
}

/// Collects rows into columns. Columns appear in first-seen order and a row
/// lacking a slug contributes an undefined cell.
pub fn rows_to_column_store(rows: &[Row]) -> ColumnStore {
    let mut store = ColumnStore::new();
    for row in rows {
        for slug in row.keys() {
            if !store.contains_key(slug) {
                store.insert(slug.clone(), Vec::with_capacity(rows.len()));
            }
        }
    }
    for row in rows {
        for (slug, column) in store.iter_mut() {
            column.push(row.get(slug).cloned());
        }
    }
    store
}

/// Returns a function joining the given columns of a row with single spaces.
pub fn make_key_fn(slugs: &[ColumnSlug]) -> impl Fn(&Row) -> String + use<> {
    let slugs = slugs.to_vec();
    move |row: &Row| {
        slugs
            .iter()
            .map(|slug| row.get(slug).map(CellValue::as_display).unwrap_or_default())
            .join(" ")
    }
}
