//! CSV input and output for the command-line tools.
//!
//! - **Delimiters**: `.tsv` files default to tab, everything else to comma,
//!   unless overridden.
//! - **Encoding**: input is decoded and output encoded via `encoding_rs`,
//!   defaulting to UTF-8.
//! - **stdin/stdout**: the `-` path reads stdin; a missing output path writes
//!   stdout.
//!
//! Raw CSV rows enter the library as string cells; typing happens later in
//! [`CoreTable::from_rows()`](crate::core_table::CoreTable::from_rows).

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::{
    core_table::CoreTable,
    data::{CellValue, Row},
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn resolve_output_delimiter(path: Option<&Path>, provided: Option<u8>, fallback: u8) -> u8 {
    if let Some(delim) = provided {
        return delim;
    }
    match path.and_then(|p| p.extension()).and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        Some(ext) if ext.eq_ignore_ascii_case("csv") => DEFAULT_CSV_DELIMITER,
        _ => fallback,
    }
}

pub fn open_csv_reader_from_path(path: &Path, delimiter: u8) -> Result<csv::Reader<Box<dyn Read>>> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(reader))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

/// Reads every record into a string-valued row keyed by header.
///
/// Short records leave their trailing columns undefined; extra fields past
/// the header are ignored.
pub fn read_rows<R: Read>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
    limit: Option<usize>,
) -> Result<Vec<Row>> {
    let headers = decode_record(&reader.byte_headers()?.clone(), encoding)?;
    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        if let Some(limit) = limit
            && row_idx >= limit
        {
            break;
        }
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let decoded = decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {}", row_idx + 2))?;
        let row = headers
            .iter()
            .zip(decoded)
            .map(|(header, field)| (header.clone(), CellValue::String(field)))
            .collect::<Row>();
        rows.push(row);
    }
    debug!("Read {} row(s) with {} header(s)", rows.len(), headers.len());
    Ok(rows)
}

pub fn read_rows_from_path(
    path: &Path,
    delimiter: Option<u8>,
    encoding: &'static Encoding,
    limit: Option<usize>,
) -> Result<Vec<Row>> {
    let delimiter = resolve_input_delimiter(path, delimiter);
    let mut reader = open_csv_reader_from_path(path, delimiter)?;
    read_rows(&mut reader, encoding, limit).with_context(|| format!("Reading CSV {path:?}"))
}

fn encode_field(text: &str, encoding: &'static Encoding) -> Result<Vec<u8>> {
    let (encoded, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(anyhow!(
            "Failed to encode '{text}' using {}",
            encoding.name()
        ));
    }
    Ok(encoded.into_owned())
}

/// Renders a cell for CSV output. Undefined and invalid cells are written empty.
pub fn csv_field(value: Option<&CellValue>) -> String {
    match value {
        Some(CellValue::Invalid(_)) | None => String::new(),
        Some(value) => value.as_display(),
    }
}

pub fn write_table<W: Write>(
    writer: W,
    table: &CoreTable,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .double_quote(true)
        .from_writer(writer);

    let headers = table
        .slugs()
        .map(|slug| encode_field(slug, encoding))
        .collect::<Result<Vec<_>>>()?;
    writer.write_record(&headers)?;

    for row_idx in 0..table.num_rows() {
        let record = table
            .column_store()
            .values()
            .map(|column| {
                encode_field(&csv_field(column.get(row_idx).and_then(Option::as_ref)), encoding)
            })
            .collect::<Result<Vec<_>>>()?;
        writer
            .write_record(&record)
            .with_context(|| format!("Writing row {}", row_idx + 2))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_table_to_path(
    path: Option<&Path>,
    table: &CoreTable,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<()> {
    let writer: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(std::io::stdout().lock()),
    };
    write_table(writer, table, delimiter, encoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    #[test]
    fn delimiter_follows_extension_unless_overridden() {
        assert_eq!(resolve_input_delimiter(Path::new("a.tsv"), None), b'\t');
        assert_eq!(resolve_input_delimiter(Path::new("a.csv"), None), b',');
        assert_eq!(resolve_input_delimiter(Path::new("a.tsv"), Some(b';')), b';');
        assert_eq!(resolve_output_delimiter(None, None, b'|'), b'|');
        assert_eq!(resolve_output_delimiter(Some(Path::new("o.TSV")), None, b','), b'\t');
    }

    #[test]
    fn read_rows_keys_cells_by_header() {
        let data = "entityName,year,value\nFrance,2000,5\nChad,2001\n";
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(data.as_bytes());
        let rows = read_rows(&mut reader, UTF_8, None).expect("rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["value"], CellValue::from("5"));
        assert!(!rows[1].contains_key("value"));
    }

    #[test]
    fn read_rows_respects_limit_and_encoding() {
        let (bytes, _, _) = WINDOWS_1252.encode("name\nCôte d'Ivoire\nPeru\n");
        let mut reader = csv::Reader::from_reader(bytes.as_ref());
        let rows = read_rows(&mut reader, WINDOWS_1252, Some(1)).expect("rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], CellValue::from("Côte d'Ivoire"));
    }

    #[test]
    fn write_table_blanks_invalid_cells() {
        let rows = vec![
            crate::data::row_from_pairs([("year", "2000"), ("value", "1.5")]),
            crate::data::row_from_pairs([("year", "2001"), ("value", "oops")]),
        ];
        let table = CoreTable::from_rows(rows, &[]).expect("table");
        let mut out = Vec::new();
        write_table(&mut out, &table, b',', UTF_8).expect("write");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "year,value\n2000,1.5\n2001,\n"
        );
    }
}
