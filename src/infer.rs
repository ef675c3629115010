//! Column definition inference for a CSV file.
//!
//! Prints the settled definitions as a table, JSON or YAML, and optionally
//! saves them as a definitions file that `--defs` can read back.

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::{
    cli::{DefsFormat, InferArgs},
    column_def::{ColumnDef, ColumnDefs},
    load_table,
    slugs::SlugRename,
    table,
};

#[derive(Debug, Serialize)]
struct InferReport<'a> {
    columns: &'a [ColumnDef],
    renames: &'a [SlugRename],
}

pub fn execute(args: &InferArgs) -> Result<()> {
    let limit = (args.sample_rows > 0).then_some(args.sample_rows);
    let table = load_table(&args.input, limit)?;

    match args.format {
        DefsFormat::Table => {
            let headers = vec![
                "#".to_string(),
                "slug".to_string(),
                "type".to_string(),
                "name".to_string(),
            ];
            let rows = table
                .defs()
                .iter()
                .enumerate()
                .map(|(idx, def)| {
                    vec![
                        (idx + 1).to_string(),
                        def.slug.clone(),
                        def.column_type.to_string(),
                        def.name.clone().unwrap_or_default(),
                    ]
                })
                .collect::<Vec<_>>();
            print!("{}", table::render_grid(&headers, &rows));
        }
        DefsFormat::Json => {
            let report = InferReport {
                columns: table.defs(),
                renames: table.renames(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Serializing definitions")?
            );
        }
        DefsFormat::Yaml => {
            let defs = ColumnDefs(table.defs().to_vec());
            print!(
                "{}",
                serde_yaml::to_string(&defs).context("Serializing definitions")?
            );
        }
    }

    if let Some(output) = &args.output {
        ColumnDefs(table.defs().to_vec())
            .save(output)
            .with_context(|| format!("Writing column defs to {output:?}"))?;
        info!(
            "Column definitions for {} column(s) written to {:?}",
            table.num_columns(),
            output
        );
    }
    Ok(())
}
