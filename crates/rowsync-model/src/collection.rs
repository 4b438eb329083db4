//! Collection configuration: the parameterization that replaces per-target
//! copy-pasted upload flows with a single pipeline.

use serde::{Deserialize, Serialize};

use crate::store::LookupMatch;

/// How a canonical field's values are shaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Single trimmed text value.
    #[default]
    Text,
    /// List of related record identifiers, merged rather than overwritten.
    Relation,
}

/// One canonical field and the source column labels that may carry it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Canonical field name; also the store-side field name.
    pub name: String,
    /// Source column label candidates in preference order. Matching is
    /// case/whitespace/punctuation-insensitive.
    pub candidates: Vec<String>,
    /// Value shape.
    #[serde(default)]
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Text field with candidate labels.
    pub fn text(name: &str, candidates: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            candidates: candidates.iter().map(|c| (*c).to_string()).collect(),
            kind: FieldKind::Text,
        }
    }

    /// Relation-list field with candidate labels.
    pub fn relation(name: &str, candidates: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            candidates: candidates.iter().map(|c| (*c).to_string()).collect(),
            kind: FieldKind::Relation,
        }
    }
}

/// One identity field used to locate an existing remote record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentitySpec {
    /// Canonical field name.
    pub field: String,
    /// Lookup filter mode for this field. Exact by default; substring
    /// matching is a deliberate knob for name fallbacks only.
    #[serde(default)]
    pub match_mode: LookupMatch,
}

impl IdentitySpec {
    /// Exact-match identity on the given field.
    pub fn exact(field: &str) -> Self {
        Self {
            field: field.to_string(),
            match_mode: LookupMatch::Exact,
        }
    }
}

/// Full description of one sync target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSpec {
    /// Target collection name in the record store.
    pub collection: String,
    /// Field allow-list. Source columns with no entry here are dropped.
    pub fields: Vec<FieldSpec>,
    /// Identity fields in lookup preference order (code before name).
    /// A record with none of these present is rejected before reconciliation.
    pub identity: Vec<IdentitySpec>,
    /// When set, the primary identity value is written as the store's own
    /// record id on create, so repeated runs find the exact same record.
    #[serde(default)]
    pub identity_as_record_id: bool,
    /// Relation-list field that receives merged relation ids.
    #[serde(default)]
    pub relation_field: Option<String>,
    /// Free-text address field feeding the geocode enricher.
    #[serde(default)]
    pub address_field: Option<String>,
}

impl CollectionSpec {
    /// Looks up a field definition by canonical name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Names of all identity fields, in preference order.
    pub fn identity_field_names(&self) -> impl Iterator<Item = &str> {
        self.identity.iter().map(|identity| identity.field.as_str())
    }
}
