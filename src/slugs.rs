//! Column header normalization.
//!
//! Headers become machine-safe slugs while keeping their letter case, since
//! entity and column names are case-sensitive. The rename list returned by
//! [`standardize_slugs()`] lets callers recover the original headers as
//! display names.

use std::{borrow::Cow, sync::OnceLock};

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::data::{ColumnSlug, Row};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlugRename {
    pub original_name: String,
    pub slug: ColumnSlug,
}

fn non_slug_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^A-Za-z0-9_\- ]+").expect("static slug pattern compiles"))
}

fn space_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r" +").expect("static space pattern compiles"))
}

/// Drops characters other than ASCII word characters, `-` and space, trims,
/// and joins words with `_`. Letter case is kept.
pub fn slugify_same_case(name: &str) -> Cow<'_, str> {
    let stripped = non_slug_chars().replace_all(name, "");
    let trimmed = stripped.trim_matches(' ');
    if trimmed.len() == name.len() && !trimmed.contains(' ') {
        return Cow::Borrowed(name);
    }
    Cow::Owned(space_runs().replace_all(trimmed, "_").into_owned())
}

/// Renames the keys of every row whose header is not already a slug.
///
/// Only the first row's keys are inspected. Returns `None` when nothing needs
/// renaming. If two headers map to the same slug the later one overwrites the
/// earlier one's value.
pub fn standardize_slugs(rows: &mut [Row]) -> Option<Vec<SlugRename>> {
    let first = rows.first()?;
    let renames = first
        .keys()
        .filter_map(|name| match slugify_same_case(name) {
            Cow::Borrowed(_) => None,
            Cow::Owned(slug) => Some(SlugRename {
                original_name: name.clone(),
                slug,
            }),
        })
        .collect::<Vec<_>>();
    if renames.is_empty() {
        return None;
    }

    for rename in &renames {
        let shared = renames
            .iter()
            .filter(|other| other.slug == rename.slug)
            .count();
        if shared > 1 || first.contains_key(&rename.slug) {
            debug!(
                "Header {:?} collides with another column on slug {:?}",
                rename.original_name, rename.slug
            );
        }
    }

    for row in rows.iter_mut() {
        for rename in &renames {
            match row.shift_remove(&rename.original_name) {
                Some(value) => {
                    row.insert(rename.slug.clone(), value);
                }
                None => {
                    row.shift_remove(&rename.slug);
                }
            }
        }
    }
    debug!("Renamed {} column header(s) to slugs", renames.len());
    Some(renames)
}
