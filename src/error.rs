use thiserror::Error;

use crate::data::ColumnSlug;

#[derive(Debug, Error, PartialEq)]
pub enum CoreTableError {
    #[error("Column '{0}' does not exist in the table")]
    UnknownColumn(ColumnSlug),
    #[error("Tolerance must be a finite, non-negative number (got {0})")]
    InvalidTolerance(f64),
    #[error("Column definition for '{0}' is given more than once")]
    DuplicateOverride(ColumnSlug),
}
