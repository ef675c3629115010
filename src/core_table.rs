//! Table construction: raw rows in, typed columnar table out.
//!
//! [`CoreTable::from_rows()`] runs one ingestion session: headers are
//! normalized to slugs, a fresh [`AutoTyper`] types every cell, the rows are
//! pivoted into a [`ColumnStore`] and a [`ColumnDef`] is settled for each
//! column.

use std::collections::{HashMap, HashSet};

use log::{debug, info};

use crate::{
    auto_type::{AutoTyper, coerce_to_number},
    column_def::{ColumnDef, guess_column_def_from_slug_and_row},
    column_store::{
        Column, ColumnStore, column_store_to_rows, make_row_from_column_store,
        rows_to_column_store,
    },
    data::{CellValue, ColumnSlug, Row},
    error::CoreTableError,
    interpolate::interpolate_grouped_with_tolerance,
    slugs::{SlugRename, standardize_slugs},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoreTable {
    defs: Vec<ColumnDef>,
    store: ColumnStore,
    renames: Vec<SlugRename>,
}

impl CoreTable {
    pub fn from_rows(mut rows: Vec<Row>, overrides: &[ColumnDef]) -> Result<Self, CoreTableError> {
        let overrides = index_overrides(overrides)?;
        let renames = standardize_slugs(&mut rows).unwrap_or_default();

        let mut typer = AutoTyper::new();
        let rows = rows
            .into_iter()
            .map(|row| typer.apply(row))
            .collect::<Vec<_>>();
        let mut store = rows_to_column_store(&rows);
        coerce_numeric_overrides(&mut store, &overrides);

        let original_names = renames
            .iter()
            .map(|rename| (rename.slug.as_str(), rename.original_name.as_str()))
            .collect::<HashMap<_, _>>();
        let defs = settle_defs(&store, &overrides, |slug| {
            original_names.get(slug).map(|name| name.to_string())
        });

        info!(
            "Built table with {} row(s) across {} column(s)",
            rows.len(),
            defs.len()
        );
        Ok(Self {
            defs,
            store,
            renames,
        })
    }

    /// Wraps an existing store. Values are taken as already typed.
    pub fn from_column_store(
        mut store: ColumnStore,
        overrides: &[ColumnDef],
    ) -> Result<Self, CoreTableError> {
        let overrides = index_overrides(overrides)?;
        coerce_numeric_overrides(&mut store, &overrides);
        let defs = settle_defs(&store, &overrides, |_| None);
        Ok(Self {
            defs,
            store,
            renames: Vec::new(),
        })
    }

    pub fn num_rows(&self) -> usize {
        self.store.values().next().map_or(0, Vec::len)
    }

    pub fn num_columns(&self) -> usize {
        self.store.len()
    }

    pub fn slugs(&self) -> impl Iterator<Item = &ColumnSlug> {
        self.store.keys()
    }

    pub fn defs(&self) -> &[ColumnDef] {
        &self.defs
    }

    pub fn def(&self, slug: &str) -> Option<&ColumnDef> {
        self.defs.iter().find(|def| def.slug == slug)
    }

    pub fn renames(&self) -> &[SlugRename] {
        &self.renames
    }

    pub fn column(&self, slug: &str) -> Option<&Column> {
        self.store.get(slug)
    }

    pub fn column_store(&self) -> &ColumnStore {
        &self.store
    }

    pub fn rows(&self) -> Vec<Row> {
        column_store_to_rows(&self.store)
    }

    pub fn row(&self, index: usize) -> Row {
        make_row_from_column_store(index, &self.store)
    }

    /// Returns a copy with blanks in `value_slug` filled from the nearest
    /// time within `tolerance`, per group of `group_slugs`.
    pub fn interpolate_column(
        &self,
        value_slug: &str,
        time_slug: &str,
        group_slugs: &[ColumnSlug],
        tolerance: f64,
    ) -> Result<Self, CoreTableError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(CoreTableError::InvalidTolerance(tolerance));
        }
        for slug in [value_slug, time_slug]
            .into_iter()
            .chain(group_slugs.iter().map(String::as_str))
        {
            if !self.store.contains_key(slug) {
                return Err(CoreTableError::UnknownColumn(slug.to_string()));
            }
        }

        let rows = interpolate_grouped_with_tolerance(
            self.rows(),
            value_slug,
            time_slug,
            group_slugs,
            tolerance,
        );
        let mut store = rows_to_column_store(&rows);
        // Keep the original column order even if the first rows lacked a slug.
        let position = |slug: &str| self.store.get_index_of(slug).unwrap_or(usize::MAX);
        store.sort_by(|left, _, right, _| position(left.as_str()).cmp(&position(right.as_str())));
        debug!("Interpolated column '{value_slug}' over {} row(s)", rows.len());

        Ok(Self {
            defs: self.defs.clone(),
            store,
            renames: self.renames.clone(),
        })
    }
}

fn index_overrides(overrides: &[ColumnDef]) -> Result<HashMap<&str, &ColumnDef>, CoreTableError> {
    let mut seen = HashSet::new();
    let mut indexed = HashMap::with_capacity(overrides.len());
    for def in overrides {
        if !seen.insert(def.slug.as_str()) {
            return Err(CoreTableError::DuplicateOverride(def.slug.clone()));
        }
        indexed.insert(def.slug.as_str(), def);
    }
    Ok(indexed)
}

/// Columns overridden with a numeric type must not keep string cells.
fn coerce_numeric_overrides(store: &mut ColumnStore, overrides: &HashMap<&str, &ColumnDef>) {
    for (slug, column) in store.iter_mut() {
        let Some(def) = overrides.get(slug.as_str()) else {
            continue;
        };
        if !def.column_type.is_numeric() {
            continue;
        }
        let mut coerced = 0usize;
        for cell in column.iter_mut().flatten() {
            if matches!(cell, CellValue::String(_)) {
                *cell = coerce_to_number(cell);
                coerced += 1;
            }
        }
        if coerced > 0 {
            debug!(
                "Coerced {coerced} string cell(s) in '{slug}' to match its {} override",
                def.column_type
            );
        }
    }
}

fn settle_defs<F>(
    store: &ColumnStore,
    overrides: &HashMap<&str, &ColumnDef>,
    original_name: F,
) -> Vec<ColumnDef>
where
    F: Fn(&str) -> Option<String>,
{
    store
        .iter()
        .map(|(slug, column)| {
            if let Some(def) = overrides.get(slug.as_str()) {
                return (*def).clone();
            }
            let sample = column.iter().find_map(Option::as_ref);
            let mut def = guess_column_def_from_slug_and_row(slug, sample);
            if def.name.is_none() {
                def.name = original_name(slug.as_str());
            }
            def
        })
        .collect()
}
