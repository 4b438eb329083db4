//! Row normalization: raw source rows into canonical records.

use rowsync_model::{CanonicalRecord, CollectionSpec, FieldKind, FieldValue};

use crate::columns::FieldMap;

/// Placeholder texts that mean "missing" in exported spreadsheets.
/// Compared case-insensitively after trimming.
const MISSING_PLACEHOLDERS: &[&str] = &["none", "nan", "null", "n/a", "na"];

/// True when a raw cell carries no usable value: blank, whitespace-only,
/// or one of the literal missing placeholders.
pub fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return true;
    }
    MISSING_PLACEHOLDERS
        .iter()
        .any(|placeholder| trimmed.eq_ignore_ascii_case(placeholder))
}

/// Splits a relation cell on comma, semicolon, newline, or tab; trims each
/// part, drops empties, and removes exact duplicates preserving first-seen
/// order.
pub fn split_relations(raw: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for part in raw.split([',', ';', '\n', '\t']) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if !parts.iter().any(|seen| seen == part) {
            parts.push(part.to_string());
        }
    }
    parts
}

/// Converts one source row into a canonical record.
///
/// Returns `None` when every configured identity field is absent; such rows
/// are reported as invalid by the driver, never as errors. Identity values
/// are kept byte-exact apart from trimming, since they must match on
/// repeated syncs.
pub fn normalize_row(
    row: &[String],
    map: &FieldMap,
    spec: &CollectionSpec,
) -> Option<CanonicalRecord> {
    let mut record = CanonicalRecord::new();
    for field in &spec.fields {
        let Some(index) = map.column(&field.name) else {
            continue;
        };
        let Some(raw) = row.get(index) else {
            continue;
        };
        if is_missing(raw) {
            continue;
        }
        match field.kind {
            FieldKind::Text => {
                record.insert(&field.name, FieldValue::Text(raw.trim().to_string()));
            }
            FieldKind::Relation => {
                let parts = split_relations(raw);
                if !parts.is_empty() {
                    record.insert(&field.name, FieldValue::List(parts));
                }
            }
        }
    }

    let has_identity = spec
        .identity_field_names()
        .any(|field| record.text(field).is_some_and(|value| !value.is_empty()));
    has_identity.then_some(record)
}
