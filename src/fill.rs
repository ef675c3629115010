//! The `interpolate` command: fill sparse values in a CSV file.

use anyhow::{Context, Result};
use log::{info, warn};

use crate::{cli::InterpolateArgs, io_utils, load_table};

pub fn execute(args: &InterpolateArgs) -> Result<()> {
    let table = load_table(&args.input, None)?;
    if table.num_rows() == 0 {
        warn!("Input {:?} has no data rows", args.input.input);
    }

    let filled = table
        .interpolate_column(&args.value, &args.time, &args.group_by, args.tolerance)
        .with_context(|| format!("Interpolating column '{}'", args.value))?;
    let unresolved = filled
        .column(&args.value)
        .map(|column| column.iter().flatten().filter(|cell| cell.is_invalid()).count())
        .unwrap_or_default();

    let input_delimiter =
        io_utils::resolve_input_delimiter(&args.input.input, args.input.delimiter);
    let delimiter = io_utils::resolve_output_delimiter(
        args.output.as_deref(),
        args.output_delimiter,
        input_delimiter,
    );
    let encoding = io_utils::resolve_encoding(args.output_encoding.as_deref())?;
    io_utils::write_table_to_path(args.output.as_deref(), &filled, delimiter, encoding)?;

    info!(
        "Interpolated '{}' over '{}' for {} row(s); {} still without a value",
        args.value,
        args.time,
        filled.num_rows(),
        unresolved
    );
    Ok(())
}
