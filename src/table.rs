use std::borrow::Cow;
use std::fmt::Write as _;

use crate::{
    column_def::ColumnDef,
    core_table::CoreTable,
    data::CellValue,
};

/// Renders up to `max_rows` rows of a table as aligned plain text.
///
/// Headers use display names. Invalid cells show their kind in brackets and
/// undefined cells are left blank.
pub fn render_table(table: &CoreTable, max_rows: usize) -> String {
    let headers = table
        .defs()
        .iter()
        .map(|def| def.display_name().to_string())
        .collect::<Vec<_>>();
    let rows = (0..table.num_rows().min(max_rows))
        .map(|row_idx| {
            table
                .defs()
                .iter()
                .map(|def| {
                    let value = table
                        .column(&def.slug)
                        .and_then(|column| column.get(row_idx))
                        .and_then(Option::as_ref);
                    render_cell(def, value)
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    render_grid(&headers, &rows)
}

fn render_cell(def: &ColumnDef, value: Option<&CellValue>) -> String {
    match value {
        None => String::new(),
        Some(CellValue::Invalid(invalid)) => format!("[{}]", invalid.kind),
        Some(value) => def.format_value(value),
    }
}

pub fn render_grid(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| display_width(h).max(3)).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_line(headers, &widths));
    let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_line(&separator, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_line(row, &widths));
    }
    output
}

fn format_line(values: &[String], widths: &[usize]) -> String {
    let line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let cell = sanitize_cell(value);
            let padding = width.saturating_sub(display_width(&cell));
            format!("{cell}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
