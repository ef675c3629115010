//! Tolerance-based filling of sparse time series.
//!
//! A blank cell borrows the nearest-in-time valid value within the tolerance,
//! preferring the later neighbour on ties. The borrowed row's time is copied
//! along with the value so the pair stays consistent. Blanks with no donor in
//! range become `NoValueWithinTolerance`.

use std::cmp::Ordering;

use indexmap::IndexMap;
use log::debug;

use crate::{
    data::{CellValue, ColumnSlug, Row, is_present_and_valid, time_of},
    invalid_cell::InvalidCell,
};

#[derive(Debug, Clone, Copy)]
enum NextDonor {
    Unscanned,
    At(usize),
    None,
}

/// Fills blank values in place. Rows must already be sorted by time ascending.
pub fn interpolate_row_values_with_tolerance(
    rows: &mut [Row],
    value_slug: &str,
    time_slug: &str,
    tolerance: f64,
) {
    let is_valid = |row: &Row| is_present_and_valid(row.get(value_slug));

    let mut prev: Option<usize> = None;
    let mut next = NextDonor::Unscanned;
    let mut filled = 0usize;
    let mut unresolved = 0usize;

    for index in 0..rows.len() {
        if is_valid(&rows[index]) {
            prev = Some(index);
            continue;
        }

        let consumed = match next {
            NextDonor::Unscanned => true,
            NextDonor::At(found) => found <= index,
            NextDonor::None => false,
        };
        if consumed {
            next = rows[index + 1..]
                .iter()
                .position(is_valid)
                .map_or(NextDonor::None, |offset| NextDonor::At(index + 1 + offset));
        }

        let current_time = time_of(&rows[index], time_slug);
        let prev_diff = prev.map_or(f64::INFINITY, |p| {
            (time_of(&rows[p], time_slug) - current_time).abs()
        });
        let next_diff = match next {
            NextDonor::At(n) => (time_of(&rows[n], time_slug) - current_time).abs(),
            _ => f64::INFINITY,
        };

        let donor = match (next, prev) {
            (NextDonor::At(n), _) if next_diff <= prev_diff && next_diff <= tolerance => Some(n),
            (_, Some(p)) if prev_diff <= tolerance => Some(p),
            _ => None,
        };

        match donor {
            Some(donor) => {
                let value = rows[donor].get(value_slug).cloned();
                let time = rows[donor].get(time_slug).cloned();
                let row = &mut rows[index];
                set_cell(row, value_slug, value);
                set_cell(row, time_slug, time);
                filled += 1;
            }
            None => {
                rows[index].insert(
                    value_slug.to_string(),
                    CellValue::Invalid(InvalidCell::no_value_within_tolerance()),
                );
                unresolved += 1;
            }
        }
    }

    debug!(
        "Interpolated '{value_slug}' over '{time_slug}' (tolerance {tolerance}): {filled} filled, {unresolved} out of tolerance"
    );
}

fn set_cell(row: &mut Row, slug: &str, value: Option<CellValue>) {
    match value {
        Some(value) => {
            row.insert(slug.to_string(), value);
        }
        None => {
            row.shift_remove(slug);
        }
    }
}

/// Stable ascending sort on a numeric time column. Non-numeric times sort last.
pub fn sort_rows_by_time(rows: &mut [Row], time_slug: &str) {
    rows.sort_by(|a, b| {
        let (left, right) = (time_of(a, time_slug), time_of(b, time_slug));
        match (left.is_nan(), right.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => left.total_cmp(&right),
        }
    });
}

/// One entry per group column, so values containing spaces can't collide.
fn group_key(row: &Row, group_slugs: &[ColumnSlug]) -> Vec<Option<String>> {
    group_slugs
        .iter()
        .map(|slug| row.get(slug).map(CellValue::as_display))
        .collect()
}

/// Interpolates each group of rows independently.
///
/// Groups are keyed on `group_slugs` and kept in first-seen order. Each group
/// is sorted by time before filling, so the output is grouped and sorted.
pub fn interpolate_grouped_with_tolerance(
    rows: Vec<Row>,
    value_slug: &str,
    time_slug: &str,
    group_slugs: &[ColumnSlug],
    tolerance: f64,
) -> Vec<Row> {
    let mut groups: IndexMap<Vec<Option<String>>, Vec<Row>> = IndexMap::new();
    for row in rows {
        groups.entry(group_key(&row, group_slugs)).or_default().push(row);
    }
    debug!("Interpolating '{value_slug}' across {} group(s)", groups.len());

    let mut output = Vec::new();
    for (_, mut group) in groups {
        sort_rows_by_time(&mut group, time_slug);
        interpolate_row_values_with_tolerance(&mut group, value_slug, time_slug, tolerance);
        output.extend(group);
    }
    output
}
