//! The record store contract the pipeline components require.

use serde_json::{Map, Value};

use crate::error::StoreResult;
use crate::record::RemoteRecord;

/// How a lookup filter matches the stored value.
///
/// Exact matching is the default; substring matching exists only as a
/// fallback mode for name lookups against stores populated with
/// inconsistent casing or prefixes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMatch {
    /// The stored value must equal the probe byte-for-byte.
    #[default]
    Exact,
    /// The stored value must contain the probe.
    Contains,
}

/// Synchronous CRUD contract against one record store.
///
/// All operations are blocking request/response; a non-2xx response
/// surfaces as [`crate::StoreError::Api`] carrying the provider's body.
pub trait RecordStore {
    /// Looks up at most one record where `field` matches `value`.
    /// Absence of a match is a normal outcome, not an error.
    fn find(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        match_mode: LookupMatch,
    ) -> StoreResult<Option<RemoteRecord>>;

    /// Creates a record from a full JSON payload and returns the stored
    /// record with its assigned identifier.
    fn create(&self, collection: &str, payload: &Map<String, Value>) -> StoreResult<RemoteRecord>;

    /// Applies a partial update carrying only the changed fields.
    fn update(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> StoreResult<RemoteRecord>;
}
