//! Single-pass type coercion for streamed rows.
//!
//! Each column is committed to a [`ColumnKind`] by the first value seen for
//! it, and every later value in that column is coerced to match. A column
//! whose first value looks numeric but later holds text gets
//! `NaNButShouldBeNumber` cells instead of strings.

use std::collections::HashMap;

use log::debug;

use crate::{
    data::{CellValue, ColumnSlug, Row, parse_number},
    invalid_cell::{InvalidCell, InvalidCellKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    String,
    Number,
}

/// Type map for one ingestion pass. Create a new one per table.
#[derive(Debug, Default)]
pub struct AutoTyper {
    kinds: HashMap<ColumnSlug, ColumnKind>,
}

impl AutoTyper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind_of(&self, slug: &str) -> Option<ColumnKind> {
        self.kinds.get(slug).copied()
    }

    pub fn apply(&mut self, mut row: Row) -> Row {
        for (slug, value) in row.iter_mut() {
            let coerced = self.coerce(slug, value);
            if let Some(coerced) = coerced {
                *value = coerced;
            }
        }
        row
    }

    /// Returns the replacement for `value`, or `None` to keep it as is.
    fn coerce(&mut self, slug: &str, value: &CellValue) -> Option<CellValue> {
        match self.kinds.get(slug) {
            Some(ColumnKind::String) => None,
            Some(ColumnKind::Number) => Some(coerce_to_number(value)),
            None => match parse_number(value) {
                Some(number) => {
                    debug!("Column '{slug}' typed as number");
                    self.kinds.insert(slug.to_string(), ColumnKind::Number);
                    Some(CellValue::Number(number))
                }
                None => {
                    debug!("Column '{slug}' typed as string");
                    self.kinds.insert(slug.to_string(), ColumnKind::String);
                    None
                }
            },
        }
    }
}

/// Coerces one cell of a numeric column. Cells that don't parse become
/// `NaNButShouldBeNumber`, carrying the raw text when there was any.
pub fn coerce_to_number(value: &CellValue) -> CellValue {
    match parse_number(value) {
        Some(number) => CellValue::Number(number),
        None => CellValue::Invalid(nan_cell(value)),
    }
}

fn nan_cell(value: &CellValue) -> InvalidCell {
    match value {
        CellValue::String(raw) => {
            InvalidCell::with_source(InvalidCellKind::NaNButShouldBeNumber, raw.clone())
        }
        _ => InvalidCell::nan_but_should_be_number(),
    }
}

/// Returns a closure that owns a fresh [`AutoTyper`].
pub fn make_auto_type_fn() -> impl FnMut(Row) -> Row {
    let mut typer = AutoTyper::new();
    move |row| typer.apply(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::row_from_pairs;

    #[test]
    fn first_value_commits_column_to_number() {
        let mut auto_type = make_auto_type_fn();
        let first = auto_type(row_from_pairs([("v", "10")]));
        let second = auto_type(row_from_pairs([("v", "20")]));
        let third = auto_type(row_from_pairs([("v", "abc")]));

        assert_eq!(first["v"], CellValue::Number(10.0));
        assert_eq!(second["v"], CellValue::Number(20.0));
        assert_eq!(
            third["v"],
            CellValue::Invalid(InvalidCell::nan_but_should_be_number())
        );
        assert_eq!(
            third["v"].as_invalid().and_then(|cell| cell.source.as_deref()),
            Some("abc")
        );
    }

    #[test]
    fn first_value_commits_column_to_string() {
        let mut typer = AutoTyper::new();
        let first = typer.apply(row_from_pairs([("name", "France")]));
        let second = typer.apply(row_from_pairs([("name", "42")]));
        assert_eq!(typer.kind_of("name"), Some(ColumnKind::String));
        assert_eq!(first["name"], CellValue::from("France"));
        assert_eq!(second["name"], CellValue::from("42"));
    }

    #[test]
    fn empty_first_value_commits_to_string() {
        let mut typer = AutoTyper::new();
        let row = typer.apply(row_from_pairs([("v", ""), ("w", " 1.5 ")]));
        assert_eq!(typer.kind_of("v"), Some(ColumnKind::String));
        assert_eq!(row["v"], CellValue::from(""));
        assert_eq!(row["w"], CellValue::Number(1.5));
    }

    #[test]
    fn infinite_first_value_commits_to_string() {
        let mut typer = AutoTyper::new();
        let row = typer.apply(row_from_pairs([("v", "inf")]));
        assert_eq!(typer.kind_of("v"), Some(ColumnKind::String));
        assert_eq!(row["v"], CellValue::from("inf"));
    }

    #[test]
    fn sessions_do_not_share_state() {
        let mut first_session = make_auto_type_fn();
        first_session(row_from_pairs([("v", "abc")]));

        let mut second_session = make_auto_type_fn();
        let row = second_session(row_from_pairs([("v", "7")]));
        assert_eq!(row["v"], CellValue::Number(7.0));
    }

    #[test]
    fn invalid_cells_stay_invalid_in_number_columns() {
        let mut typer = AutoTyper::new();
        typer.apply(row_from_pairs([("v", 1i64)]));
        let row = typer.apply(row_from_pairs([(
            "v",
            CellValue::Invalid(InvalidCell::no_value_within_tolerance()),
        )]));
        assert_eq!(
            row["v"],
            CellValue::Invalid(InvalidCell::nan_but_should_be_number())
        );
    }
}
