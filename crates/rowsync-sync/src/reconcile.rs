//! The reconciler: per-record create-vs-update decisions.
//!
//! Each record costs at most one lookup and one mutating call. Re-running a
//! sync against an already-synced store issues zero writes; that is the
//! idempotence guarantee the rest of the pipeline leans on.

use serde_json::Value;
use tracing::{debug, info};

use rowsync_model::{
    CanonicalRecord, CollectionSpec, IdentitySpec, RecordStore, RemoteRecord, StoreResult,
    SyncOutcome,
};

/// Reconciles canonical records against one target collection.
pub struct Reconciler<'a> {
    store: &'a dyn RecordStore,
    spec: &'a CollectionSpec,
    dry_run: bool,
}

impl<'a> Reconciler<'a> {
    /// Creates a reconciler for the given store and collection.
    pub fn new(store: &'a dyn RecordStore, spec: &'a CollectionSpec) -> Self {
        Self {
            store,
            spec,
            dry_run: false,
        }
    }

    /// In dry-run mode intended mutations are logged but never issued; the
    /// reported outcome is what a real run would have produced.
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// The record's primary identity: the first configured identity field
    /// carrying a non-empty value. Code comes before name in any sensible
    /// configuration, since codes are assumed globally unique.
    pub fn identity_of<'r>(&self, record: &'r CanonicalRecord) -> Option<(&IdentitySpec, &'r str)> {
        self.spec.identity.iter().find_map(|identity| {
            record
                .text(&identity.field)
                .filter(|value| !value.is_empty())
                .map(|value| (identity, value))
        })
    }

    /// Ensures the store reflects the record, merging `relation_id` (when
    /// given) into the relation-list field. Store failures are caught here,
    /// at row granularity, and reported as `Failed`.
    pub fn reconcile(&self, record: &CanonicalRecord, relation_id: Option<&str>) -> SyncOutcome {
        match self.try_reconcile(record, relation_id) {
            Ok(outcome) => outcome,
            Err(err) => SyncOutcome::Failed(err.to_string()),
        }
    }

    fn try_reconcile(
        &self,
        record: &CanonicalRecord,
        relation_id: Option<&str>,
    ) -> StoreResult<SyncOutcome> {
        let Some((identity, value)) = self.identity_of(record) else {
            return Ok(SyncOutcome::SkippedInvalid);
        };
        let existing = self.store.find(
            &self.spec.collection,
            &identity.field,
            value,
            identity.match_mode,
        )?;
        match existing {
            None => self.create(record, value, relation_id),
            Some(remote) => self.merge_into(&remote, record, relation_id),
        }
    }

    fn create(
        &self,
        record: &CanonicalRecord,
        identity_value: &str,
        relation_id: Option<&str>,
    ) -> StoreResult<SyncOutcome> {
        let mut payload = record.payload();
        if let Some(field) = &self.spec.relation_field {
            let own: Vec<String> = record.list(field).unwrap_or_default().to_vec();
            let extra: Vec<String> = relation_id.map(str::to_string).into_iter().collect();
            let ids = merge_relations(&own, &extra);
            if ids.is_empty() {
                payload.remove(field);
            } else {
                payload.insert(
                    field.clone(),
                    Value::Array(ids.into_iter().map(Value::String).collect()),
                );
            }
        }
        // Writing the identity as the record id is what lets the next run
        // find this exact record instead of creating a duplicate.
        if self.spec.identity_as_record_id {
            payload.insert("id".to_string(), Value::String(identity_value.to_string()));
        }
        if self.dry_run {
            info!(
                collection = %self.spec.collection,
                identity = %identity_value,
                payload = %serde_json::Value::Object(payload.clone()),
                "dry-run: would create"
            );
            return Ok(SyncOutcome::Created);
        }
        let stored = self.store.create(&self.spec.collection, &payload)?;
        info!(
            collection = %self.spec.collection,
            id = %stored.id,
            identity = %identity_value,
            "created record"
        );
        Ok(SyncOutcome::Created)
    }

    fn merge_into(
        &self,
        remote: &RemoteRecord,
        record: &CanonicalRecord,
        relation_id: Option<&str>,
    ) -> StoreResult<SyncOutcome> {
        let Some(field) = &self.spec.relation_field else {
            // Nothing to merge; the record already exists.
            return Ok(SyncOutcome::SkippedUnchanged);
        };
        let existing = remote.relation_list(field);
        let mut incoming: Vec<String> = record.list(field).unwrap_or_default().to_vec();
        if let Some(id) = relation_id {
            incoming.push(id.to_string());
        }
        let merged = merge_relations(&existing, &incoming);
        if merged == existing {
            debug!(
                id = %remote.id,
                field = %field,
                "relations already present; no write"
            );
            return Ok(SyncOutcome::SkippedUnchanged);
        }
        // Partial update only: the relation field is the single field this
        // pipeline owns on existing records.
        let mut fields = serde_json::Map::new();
        fields.insert(
            field.clone(),
            Value::Array(merged.iter().cloned().map(Value::String).collect()),
        );
        if self.dry_run {
            info!(
                collection = %self.spec.collection,
                id = %remote.id,
                field = %field,
                merged = ?merged,
                "dry-run: would update"
            );
            return Ok(SyncOutcome::Updated);
        }
        self.store.update(&self.spec.collection, &remote.id, &fields)?;
        info!(
            collection = %self.spec.collection,
            id = %remote.id,
            field = %field,
            "merged relations"
        );
        Ok(SyncOutcome::Updated)
    }
}

/// Order-preserving set union: the existing list stays in place, new ids
/// are appended in input order, exact duplicates are dropped.
pub fn merge_relations(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = existing.to_vec();
    for id in incoming {
        if !merged.iter().any(|seen| seen == id) {
            merged.push(id.clone());
        }
    }
    merged
}
