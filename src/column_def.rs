//! Column definitions, the column type enumeration, and type inference.
//!
//! A [`ColumnDef`] is created once per column, either supplied by the caller
//! (typically from a YAML definitions file) or guessed from the column slug
//! and a sample value by [`guess_column_def_from_slug_and_row()`].

use std::{
    fmt,
    fs::File,
    io::{BufReader, Write},
    path::Path,
    sync::{LazyLock, OnceLock},
};

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::data::{CellValue, ColumnSlug};

pub const DAY_SLUG: &str = "day";
pub const YEAR_SLUG: &str = "year";
pub const ENTITY_NAME_SLUG: &str = "entityName";
pub const ENTITY_CODE_SLUG: &str = "entityCode";
pub const ENTITY_ID_SLUG: &str = "entityId";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ColumnTypeName {
    String,
    Numeric,
    Integer,
    Date,
    Day,
    Year,
    EntityName,
    EntityCode,
    EntityId,
    Categorical,
    Boolean,
    Currency,
    Percentage,
    Ratio,
    Region,
    Continent,
    Color,
}

impl ColumnTypeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnTypeName::String => "String",
            ColumnTypeName::Numeric => "Numeric",
            ColumnTypeName::Integer => "Integer",
            ColumnTypeName::Date => "Date",
            ColumnTypeName::Day => "Day",
            ColumnTypeName::Year => "Year",
            ColumnTypeName::EntityName => "EntityName",
            ColumnTypeName::EntityCode => "EntityCode",
            ColumnTypeName::EntityId => "EntityId",
            ColumnTypeName::Categorical => "Categorical",
            ColumnTypeName::Boolean => "Boolean",
            ColumnTypeName::Currency => "Currency",
            ColumnTypeName::Percentage => "Percentage",
            ColumnTypeName::Ratio => "Ratio",
            ColumnTypeName::Region => "Region",
            ColumnTypeName::Continent => "Continent",
            ColumnTypeName::Color => "Color",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnTypeName::Numeric
                | ColumnTypeName::Integer
                | ColumnTypeName::Year
                | ColumnTypeName::Day
                | ColumnTypeName::Date
                | ColumnTypeName::EntityId
                | ColumnTypeName::Currency
                | ColumnTypeName::Percentage
                | ColumnTypeName::Ratio
        )
    }
}

impl fmt::Display for ColumnTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnDef {
    pub slug: ColumnSlug,
    #[serde(rename = "type")]
    pub column_type: ColumnTypeName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ColumnDef {
    pub fn new(slug: impl Into<ColumnSlug>, column_type: ColumnTypeName) -> Self {
        Self {
            slug: slug.into(),
            column_type,
            name: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Human-readable name, falling back to the slug.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.slug)
    }

    /// Renders a cell for display. Day-offset date columns render as ISO dates.
    pub fn format_value(&self, value: &CellValue) -> String {
        if self.column_type == ColumnTypeName::Date
            && self.slug == DAY_SLUG
            && let CellValue::Number(offset) = value
            && let Some(date) = format_day(*offset)
        {
            return date;
        }
        value.as_display()
    }
}

pub static ENTITY_NAME_COLUMN_DEF: LazyLock<ColumnDef> = LazyLock::new(|| {
    ColumnDef::new(ENTITY_NAME_SLUG, ColumnTypeName::EntityName).named("Entity")
});

pub static ENTITY_CODE_COLUMN_DEF: LazyLock<ColumnDef> = LazyLock::new(|| {
    ColumnDef::new(ENTITY_CODE_SLUG, ColumnTypeName::EntityCode).named("Code")
});

pub static ENTITY_ID_COLUMN_DEF: LazyLock<ColumnDef> = LazyLock::new(|| {
    ColumnDef::new(ENTITY_ID_SLUG, ColumnTypeName::EntityId).named("Entity ID")
});

fn digits_only() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"^[0-9]+$").expect("static digit pattern compiles"))
}

pub fn guess_column_def_from_slug_and_row(slug: &str, sample: Option<&CellValue>) -> ColumnDef {
    match slug {
        DAY_SLUG => return ColumnDef::new(DAY_SLUG, ColumnTypeName::Date).named("Date"),
        YEAR_SLUG => return ColumnDef::new(YEAR_SLUG, ColumnTypeName::Year).named("Year"),
        ENTITY_NAME_SLUG => return ENTITY_NAME_COLUMN_DEF.clone(),
        ENTITY_CODE_SLUG => return ENTITY_CODE_COLUMN_DEF.clone(),
        ENTITY_ID_SLUG => return ENTITY_ID_COLUMN_DEF.clone(),
        _ => {}
    }

    match sample {
        Some(CellValue::Number(_)) => ColumnDef::new(slug, ColumnTypeName::Numeric),
        Some(CellValue::String(s)) if digits_only().is_match(s) => {
            ColumnDef::new(slug, ColumnTypeName::Numeric)
        }
        _ => ColumnDef::new(slug, ColumnTypeName::String),
    }
}

/// Day columns count days from this date.
pub fn day_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 21).expect("epoch date is valid")
}

pub fn format_day(offset: f64) -> Option<String> {
    if !offset.is_finite() || offset.fract() != 0.0 {
        return None;
    }
    let epoch = day_epoch();
    let date = if offset >= 0.0 {
        epoch.checked_add_days(Days::new(offset as u64))?
    } else {
        epoch.checked_sub_days(Days::new(offset.abs() as u64))?
    };
    Some(date.format("%Y-%m-%d").to_string())
}

/// Column definitions persisted as a YAML list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ColumnDefs(pub Vec<ColumnDef>);

impl ColumnDefs {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening column defs {path:?}"))?;
        let reader = BufReader::new(file);
        let defs = serde_yaml::from_reader(reader)
            .with_context(|| format!("Parsing column defs YAML {path:?}"))?;
        Ok(defs)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_yaml::to_string(self).context("Serializing column defs")?;
        let mut file =
            File::create(path).with_context(|| format!("Creating column defs {path:?}"))?;
        file.write_all(serialized.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    pub fn as_slice(&self) -> &[ColumnDef] {
        &self.0
    }
}
