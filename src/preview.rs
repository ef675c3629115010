use anyhow::Result;
use log::info;

use crate::{cli::PreviewArgs, load_table, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let table = load_table(&args.input, Some(args.rows))?;
    print!("{}", table::render_table(&table, args.rows));
    info!(
        "Displayed {} row(s) from {:?}",
        table.num_rows(),
        args.input.input
    );
    Ok(())
}
