//! Out-of-band row exclusion.
//!
//! Spreadsheet workflows flag rows to skip with a marker the data itself
//! does not carry (highlighting in the original exports). For CSV sources
//! the marker is a designated column/value pair; flagged rows are filtered
//! before normalization and never reach the reconciler.

use tracing::debug;

use crate::columns::normalize_label;

/// Marker configuration: rows whose marker column equals the marker value
/// (case-insensitive) are excluded from the sync entirely.
#[derive(Debug, Clone)]
pub struct RowExclusion {
    /// Marker column label.
    pub column: String,
    /// Marker value.
    pub value: String,
}

/// A compiled exclusion filter bound to one source table's headers.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    index: usize,
    value: String,
}

impl ExclusionFilter {
    /// Binds an exclusion marker to the source headers. Returns `None`
    /// when the marker column does not exist; nothing is excluded then.
    pub fn bind(exclusion: &RowExclusion, headers: &[String]) -> Option<Self> {
        let wanted = normalize_label(&exclusion.column);
        let index = headers
            .iter()
            .position(|header| normalize_label(header) == wanted)?;
        debug!(column = %headers[index], value = %exclusion.value, "row exclusion active");
        Some(Self {
            index,
            value: exclusion.value.trim().to_string(),
        })
    }

    /// True when the row carries the exclusion marker.
    pub fn is_excluded(&self, row: &[String]) -> bool {
        row.get(self.index)
            .is_some_and(|cell| cell.trim().eq_ignore_ascii_case(&self.value))
    }
}
