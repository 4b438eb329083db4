//! CSV source loading.
//!
//! Produces an ordered sequence of untyped rows with labeled columns.
//! Rows are ephemeral; they exist only for the duration of one sync pass.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{IngestError, Result};

/// One loaded source table: header labels plus raw string rows, padded or
/// truncated to the header width.
#[derive(Debug, Clone)]
pub struct SourceTable {
    /// Column labels as they appear in the file, BOM and whitespace trimmed.
    pub headers: Vec<String>,
    /// Data rows in file order.
    pub rows: Vec<Vec<String>>,
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads a CSV file into a [`SourceTable`].
///
/// The first non-empty row is the header; fully empty rows are dropped.
/// Short records are padded with empty cells so every row has one cell per
/// header.
pub fn read_source(path: &Path) -> Result<SourceTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(IngestError::Csv)?;

    let mut headers: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(normalize_cell).collect();
        if cells.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        match &headers {
            None => {
                headers = Some(cells.iter().map(|cell| normalize_header(cell)).collect());
            }
            Some(labels) => {
                let mut row = Vec::with_capacity(labels.len());
                for idx in 0..labels.len() {
                    row.push(cells.get(idx).cloned().unwrap_or_default());
                }
                rows.push(row);
            }
        }
    }

    let headers = headers
        .ok_or_else(|| IngestError::EmptySource(path.display().to_string()))?;
    debug!(
        columns = headers.len(),
        rows = rows.len(),
        path = %path.display(),
        "loaded source table"
    );
    Ok(SourceTable { headers, rows })
}
