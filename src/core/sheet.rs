//! Loading the raw, headerless sheet from a CSV export.

use crate::core::types::Row;
use crate::error::{Error, Result};
use std::io::Read;
use std::path::Path;

/// The whole export as ragged rows of loosely typed cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    rows: Vec<Row>,
}

impl Sheet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row; exports are ragged, so this is not the width of every row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Row::len).max().unwrap_or(0)
    }
}

/// Reads a CSV file into a [`Sheet`].
///
/// A missing path is reported as [`Error::FileNotFound`] before any I/O.
pub fn load_sheet(path: &Path) -> Result<Sheet> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    let sheet = read_sheet(file)?;
    tracing::info!(
        path = %path.display(),
        rows = sheet.row_count(),
        columns = sheet.width(),
        "Loaded sheet"
    );
    Ok(sheet)
}

/// Parses CSV data from any reader. Every record becomes a row, including
/// the front matter; invalid UTF-8 is replaced rather than dropping the row.
pub fn read_sheet<R: Read>(reader: R) -> Result<Sheet> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.byte_records() {
        let record = record?;
        let fields: Vec<String> = record
            .iter()
            .map(|f| String::from_utf8_lossy(f).into_owned())
            .collect();
        rows.push(Row::from_fields(&fields));
    }

    Ok(Sheet::new(rows))
}
