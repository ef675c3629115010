use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::invalid_cell::InvalidCell;

pub type ColumnSlug = String;

/// One logical record. A slug missing from the map is an undefined cell.
pub type Row = IndexMap<ColumnSlug, CellValue>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    String(String),
    Invalid(InvalidCell),
}

impl CellValue {
    pub fn as_display(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::Invalid(invalid) => invalid.to_string(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_invalid(&self) -> Option<&InvalidCell> {
        match self {
            CellValue::Invalid(invalid) => Some(invalid),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, CellValue::Invalid(_))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<InvalidCell> for CellValue {
    fn from(value: InvalidCell) -> Self {
        CellValue::Invalid(value)
    }
}

/// False for undefined cells and for every [`InvalidCell`], true otherwise.
pub fn is_present_and_valid(value: Option<&CellValue>) -> bool {
    matches!(value, Some(v) if !v.is_invalid())
}

/// Parses a cell as a float the way the auto-typer does.
///
/// Strings are trimmed and must parse in full to a finite float, so `"inf"`
/// and `"NaN"` are rejected. A numeric NaN also counts as a failure, and
/// invalid cells never parse.
pub fn parse_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => (!n.is_nan()).then_some(*n),
        CellValue::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        CellValue::Invalid(_) => None,
    }
}

/// Reads a time cell as a float; anything non-numeric becomes NaN.
pub(crate) fn time_of(row: &Row, time_slug: &str) -> f64 {
    row.get(time_slug)
        .and_then(CellValue::as_number)
        .unwrap_or(f64::NAN)
}

/// Builds a row from `(slug, value)` pairs, keeping their order.
pub fn row_from_pairs<I, K, V>(pairs: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<ColumnSlug>,
    V: Into<CellValue>,
{
    pairs
        .into_iter()
        .map(|(slug, value)| (slug.into(), value.into()))
        .collect()
}
