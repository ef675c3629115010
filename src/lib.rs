pub mod auto_type;
pub mod cli;
pub mod column_def;
pub mod column_store;
pub mod core_table;
pub mod data;
pub mod error;
pub mod fill;
pub mod infer;
pub mod interpolate;
pub mod invalid_cell;
pub mod io_utils;
pub mod preview;
pub mod slugs;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, InputArgs},
    column_def::ColumnDefs,
    core_table::CoreTable,
};

pub use crate::{
    auto_type::{AutoTyper, make_auto_type_fn},
    column_def::{ColumnDef, ColumnTypeName, guess_column_def_from_slug_and_row},
    column_store::{
        ColumnStore, column_store_to_rows, make_key_fn, make_row_from_column_store,
        rows_to_column_store,
    },
    data::{CellValue, ColumnSlug, Row, is_present_and_valid},
    interpolate::{interpolate_grouped_with_tolerance, interpolate_row_values_with_tolerance},
    invalid_cell::{InvalidCell, InvalidCellKind},
    slugs::{SlugRename, standardize_slugs},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("coretable", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Infer(args) => infer::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Interpolate(args) => fill::execute(&args),
    }
}

/// Reads a CSV file and builds a typed table, applying `--defs` overrides.
pub(crate) fn load_table(args: &InputArgs, limit: Option<usize>) -> Result<CoreTable> {
    info!(
        "Loading '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(io_utils::resolve_input_delimiter(&args.input, args.delimiter))
    );
    let overrides = match &args.defs {
        Some(path) => ColumnDefs::load(path)
            .with_context(|| format!("Loading column defs from {path:?}"))?,
        None => ColumnDefs::default(),
    };
    debug!("Column definition overrides: {}", overrides.as_slice().len());

    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let rows = io_utils::read_rows_from_path(&args.input, args.delimiter, encoding, limit)?;
    CoreTable::from_rows(rows, overrides.as_slice())
        .with_context(|| format!("Building table from {:?}", args.input))
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
