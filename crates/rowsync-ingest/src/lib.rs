//! Source ingestion for the rowsync pipeline: CSV loading, column
//! resolution, row exclusion, and record normalization.

pub mod columns;
pub mod error;
pub mod exclude;
pub mod normalize;
pub mod source;

pub use columns::{FieldMap, ensure_identity_columns, normalize_label, resolve_columns};
pub use error::{IngestError, Result};
pub use exclude::{ExclusionFilter, RowExclusion};
pub use normalize::{is_missing, normalize_row, split_relations};
pub use source::{SourceTable, read_source};
