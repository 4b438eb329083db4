//! Column resolution: mapping variant source labels to canonical fields.

use std::collections::BTreeMap;

use tracing::debug;

use rowsync_model::CollectionSpec;

use crate::error::{IngestError, Result};

/// Resolved mapping from canonical field name to source column index.
///
/// A canonical field with no matching column is absent from the map,
/// never mapped to a null column.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    columns: BTreeMap<String, usize>,
}

impl FieldMap {
    /// Column index carrying the given canonical field, if resolved.
    pub fn column(&self, field: &str) -> Option<usize> {
        self.columns.get(field).copied()
    }

    /// True when the canonical field resolved to a source column.
    pub fn contains(&self, field: &str) -> bool {
        self.columns.contains_key(field)
    }

    /// Number of resolved fields.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when nothing resolved.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Normalizes a column label for comparison: strips every non-alphanumeric
/// character and lowercases, so `Item_Code`, `Item Code`, and `ITEMCODE`
/// all compare equal.
pub fn normalize_label(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// Resolves each canonical field against the source headers.
///
/// The first candidate label (in the field's preference order) that matches
/// any header wins. Deterministic and side-effect-free; absence of a match
/// is a normal outcome.
pub fn resolve_columns(headers: &[String], spec: &CollectionSpec) -> FieldMap {
    let mut by_norm: BTreeMap<String, usize> = BTreeMap::new();
    for (index, header) in headers.iter().enumerate() {
        // First occurrence wins for duplicate headers.
        by_norm.entry(normalize_label(header)).or_insert(index);
    }

    let mut map = FieldMap::default();
    for field in &spec.fields {
        for candidate in &field.candidates {
            if let Some(&index) = by_norm.get(&normalize_label(candidate)) {
                debug!(
                    field = %field.name,
                    column = %headers[index],
                    "resolved column"
                );
                map.columns.insert(field.name.clone(), index);
                break;
            }
        }
    }
    map
}

/// Fails when none of the configured identity columns exist in the source.
/// This is a configuration error and aborts before any row is processed.
pub fn ensure_identity_columns(map: &FieldMap, spec: &CollectionSpec) -> Result<()> {
    if spec.identity_field_names().any(|field| map.contains(field)) {
        Ok(())
    } else {
        Err(IngestError::MissingIdentityColumns {
            expected: spec.identity_field_names().map(str::to_string).collect(),
        })
    }
}
