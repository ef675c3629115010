use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Build typed column tables from CSV data", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Infer column definitions and slug renames for a CSV file
    Infer(InferArgs),
    /// Show the first rows of a CSV file after typing
    Preview(PreviewArgs),
    /// Fill blank values from the nearest time within a tolerance
    Interpolate(InterpolateArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DefsFormat {
    Table,
    Json,
    Yaml,
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input CSV file (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// YAML file of column definitions that override inferred ones
    #[arg(long)]
    pub defs: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct InferArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Write the inferred definitions to this YAML file
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Format used when printing definitions to stdout
    #[arg(long, value_enum, default_value_t = DefsFormat::Table)]
    pub format: DefsFormat,
    /// Number of rows to read (0 means all rows)
    #[arg(long, default_value_t = 0)]
    pub sample_rows: usize,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct InterpolateArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Column whose blank values are filled
    #[arg(long = "value")]
    pub value: String,
    /// Numeric time column the rows are aligned on
    #[arg(long = "time", default_value = "year")]
    pub time: String,
    /// Largest time distance a value may be borrowed across
    #[arg(long, default_value_t = 0.0)]
    pub tolerance: f64,
    /// Columns identifying independent series, e.g. `entityName`
    #[arg(long = "group-by", value_delimiter = ',')]
    pub group_by: Vec<String>,
    /// Output delimiter (defaults to the output extension or the input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding for the output (defaults to utf-8)
    #[arg(long = "output-encoding")]
    pub output_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
