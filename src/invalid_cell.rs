//! Sentinel cells for values that could not be parsed or resolved.
//!
//! An [`InvalidCell`] sits in a column where a legitimate value was expected
//! but none could be produced. It is never numeric, never a string and never
//! "present": consumers decide how to render or report it.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum InvalidCellKind {
    NaNButShouldBeNumber,
    NoValueWithinTolerance,
    NotAParseableNumberButShouldBeNumber,
    UndefinedButShouldBeNumber,
    NullButShouldBeNumber,
    BlankButShouldBeNumber,
    UndefinedButShouldBeString,
    NoMatchingValueAfterJoin,
    DivideByZeroError,
    InvalidOnALogAxis,
    NoValueForInterpolation,
}

impl InvalidCellKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidCellKind::NaNButShouldBeNumber => "NaNButShouldBeNumber",
            InvalidCellKind::NoValueWithinTolerance => "NoValueWithinTolerance",
            InvalidCellKind::NotAParseableNumberButShouldBeNumber => {
                "NotAParseableNumberButShouldBeNumber"
            }
            InvalidCellKind::UndefinedButShouldBeNumber => "UndefinedButShouldBeNumber",
            InvalidCellKind::NullButShouldBeNumber => "NullButShouldBeNumber",
            InvalidCellKind::BlankButShouldBeNumber => "BlankButShouldBeNumber",
            InvalidCellKind::UndefinedButShouldBeString => "UndefinedButShouldBeString",
            InvalidCellKind::NoMatchingValueAfterJoin => "NoMatchingValueAfterJoin",
            InvalidCellKind::DivideByZeroError => "DivideByZeroError",
            InvalidCellKind::InvalidOnALogAxis => "InvalidOnALogAxis",
            InvalidCellKind::NoValueForInterpolation => "NoValueForInterpolation",
        }
    }
}

impl fmt::Display for InvalidCellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cell that holds no legitimate value.
///
/// Two invalid cells are equal when their kinds match. `source` records the
/// raw input that produced the cell, if any, and takes no part in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidCell {
    pub kind: InvalidCellKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl InvalidCell {
    pub fn new(kind: InvalidCellKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(kind: InvalidCellKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: Some(source.into()),
        }
    }

    pub fn nan_but_should_be_number() -> Self {
        Self::new(InvalidCellKind::NaNButShouldBeNumber)
    }

    pub fn no_value_within_tolerance() -> Self {
        Self::new(InvalidCellKind::NoValueWithinTolerance)
    }
}

impl From<InvalidCellKind> for InvalidCell {
    fn from(kind: InvalidCellKind) -> Self {
        Self::new(kind)
    }
}

impl PartialEq for InvalidCell {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for InvalidCell {}

impl fmt::Display for InvalidCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_source() {
        let plain = InvalidCell::nan_but_should_be_number();
        let sourced = InvalidCell::with_source(InvalidCellKind::NaNButShouldBeNumber, "abc");
        assert_eq!(plain, sourced);
        assert_ne!(plain, InvalidCell::no_value_within_tolerance());
    }

    #[test]
    fn display_uses_kind_name() {
        assert_eq!(
            InvalidCell::no_value_within_tolerance().to_string(),
            "NoValueWithinTolerance"
        );
    }
}
