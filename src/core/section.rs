//! Locating the data table inside the free-form sheet
//!
//! Exports carry a block of front matter, then an anchor row with a fixed
//! marker, a header row and the data rows, terminated by the first fully
//! blank row. When the anchor is missing the whole post-offset sheet is
//! treated as data so that older exports still produce a graph.

use crate::config::ExplorerConfig;
use crate::core::sheet::Sheet;
use crate::core::types::Row;

/// The located data region. Rows borrow from the [`Sheet`].
#[derive(Debug, Clone)]
pub struct Section<'a> {
    /// Absolute index of the anchor row, `None` in whole-sheet mode
    pub anchor_row: Option<usize>,
    pub header: Option<&'a Row>,
    pub rows: Vec<&'a Row>,
}

impl<'a> Section<'a> {
    /// First data row, used as the sample for pattern detection.
    pub fn sample_row(&self) -> Option<&'a Row> {
        self.rows.first().copied()
    }
}

/// Finds the data region of `sheet`. Never fails: a missing anchor degrades
/// to whole-sheet mode with a warning.
pub fn locate_section<'a>(sheet: &'a Sheet, config: &ExplorerConfig) -> Section<'a> {
    let rows = sheet.rows();
    let offset = config.data_start_row.min(rows.len());
    let body = &rows[offset..];

    let anchor = body.iter().position(|row| row_contains(row, &config.anchor));

    let Some(anchor_pos) = anchor else {
        tracing::warn!(
            anchor = %config.anchor,
            "Could not find anchor section, using all rows after the front matter"
        );
        return Section {
            anchor_row: None,
            header: None,
            rows: body.iter().collect(),
        };
    };

    let header = body.get(anchor_pos + 1);
    let data_start = (anchor_pos + 2).min(body.len());
    let data = &body[data_start..];
    let data_end = data.iter().position(Row::is_blank).unwrap_or(data.len());

    tracing::debug!(
        anchor_row = offset + anchor_pos,
        data_rows = data_end,
        "Located data section"
    );

    Section {
        anchor_row: Some(offset + anchor_pos),
        header,
        rows: data[..data_end].iter().collect(),
    }
}

fn row_contains(row: &Row, needle: &str) -> bool {
    row.cells()
        .iter()
        .filter_map(|c| c.as_str())
        .any(|text| text.contains(needle))
}

/// Finds the first column whose header or data cells contain `marker`
/// (case-insensitive) and returns the column to its right, where the
/// boolean-like value lives.
pub fn find_marker_column(section: &Section<'_>, marker: &str) -> Option<usize> {
    let marker = marker.to_lowercase();
    let width = section
        .header
        .into_iter()
        .chain(section.rows.iter().copied())
        .map(Row::len)
        .max()
        .unwrap_or(0);

    (0..width)
        .find(|&col| {
            section
                .header
                .into_iter()
                .chain(section.rows.iter().copied())
                .filter_map(|row| row.cell(col).as_str())
                .any(|text| text.to_lowercase().contains(&marker))
        })
        .map(|col| col + 1)
}

/// Whether the marker value in `column` is exactly "1" once trimmed.
pub fn flag_is_set(row: &Row, column: usize) -> bool {
    row.cell(column).trimmed() == Some("1")
}

/// Drops rows whose exclusion flag is set (the quote rows of an export).
/// Returns the number of removed rows; a missing marker is a no-op.
pub fn exclude_marked_rows(section: &mut Section<'_>, marker: &str) -> usize {
    let Some(column) = find_marker_column(section, marker) else {
        tracing::debug!(marker, "Exclusion marker not found, keeping all rows");
        return 0;
    };

    let before = section.rows.len();
    section.rows.retain(|row| !flag_is_set(row, column));
    let removed = before - section.rows.len();
    tracing::info!(marker, column, removed, "Excluded marked rows");
    removed
}
