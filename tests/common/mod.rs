#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use coretable::{CellValue, Row};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// A sparse two-country series with a header that needs slugging.
pub const SPARSE_CSV: &str = "\
entityName,year,GDP per capita
France,2000,5
France,2001,
France,2002,
France,2003,
France,2004,9
Chad,2000,
Chad,2001,2
";

/// Builds a row of `year` and optional numeric `value`.
pub fn year_row(year: f64, value: Option<f64>) -> Row {
    let mut row = Row::new();
    row.insert("year".to_string(), CellValue::Number(year));
    if let Some(value) = value {
        row.insert("value".to_string(), CellValue::Number(value));
    }
    row
}
