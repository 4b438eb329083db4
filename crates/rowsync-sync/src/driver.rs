//! The sync driver: one sequential pass over all source rows.
//!
//! Rows are fully resolved one at a time (lookup, decide, mutate), which
//! keeps the relation read-modify-write free of interleaved writers within
//! a run. Row failures never stop the pass; only source and configuration
//! problems abort before the first row.

use tracing::{debug, info, warn};

use rowsync_ingest::{
    ExclusionFilter, FieldMap, Result as IngestResult, RowExclusion, SourceTable,
    ensure_identity_columns, normalize_row, resolve_columns,
};
use rowsync_model::{
    CanonicalRecord, CollectionSpec, FieldValue, GeoMode, GeoResult, Geocoder, RecordStore,
    RunSummary, SyncOutcome,
};

use crate::reconcile::Reconciler;

/// Canonical field receiving the resolved latitude.
const LATITUDE_FIELD: &str = "latitude";
/// Canonical field receiving the resolved longitude.
const LONGITUDE_FIELD: &str = "longitude";
/// Canonical field receiving the resolved district name.
const DISTRICT_FIELD: &str = "district";

/// Run-level options.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Relation id merged into every record's relation-list field.
    pub relation_id: Option<String>,
    /// Enrichment mode; `None` disables geocoding even when a geocoder is
    /// supplied.
    pub geo_mode: Option<GeoMode>,
    /// Compute and log intended mutations without issuing them.
    pub dry_run: bool,
    /// Out-of-band marker excluding rows before normalization.
    pub exclusion: Option<RowExclusion>,
}

/// Drives the full pipeline pass for one source table.
pub struct SyncDriver<'a> {
    store: &'a dyn RecordStore,
    spec: &'a CollectionSpec,
    geocoder: Option<&'a dyn Geocoder>,
    options: SyncOptions,
}

impl<'a> SyncDriver<'a> {
    /// Creates a driver with default options and no enrichment.
    pub fn new(store: &'a dyn RecordStore, spec: &'a CollectionSpec) -> Self {
        Self {
            store,
            spec,
            geocoder: None,
            options: SyncOptions::default(),
        }
    }

    /// Attaches a geocoder for address enrichment.
    #[must_use]
    pub fn with_geocoder(mut self, geocoder: &'a dyn Geocoder) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    /// Applies run options.
    #[must_use]
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs the pass: resolve columns once, then normalize, enrich, and
    /// reconcile every row, tallying outcomes. Completes the full sequence
    /// even when individual rows fail.
    pub fn run(&self, table: &SourceTable) -> IngestResult<RunSummary> {
        let map = resolve_columns(&table.headers, self.spec);
        ensure_identity_columns(&map, self.spec)?;
        info!(
            collection = %self.spec.collection,
            columns = map.len(),
            rows = table.rows.len(),
            dry_run = self.options.dry_run,
            "starting sync pass"
        );

        let filter = self
            .options
            .exclusion
            .as_ref()
            .and_then(|exclusion| ExclusionFilter::bind(exclusion, &table.headers));
        let reconciler = Reconciler::new(self.store, self.spec).dry_run(self.options.dry_run);

        let mut summary = RunSummary::new();
        for (index, row) in table.rows.iter().enumerate() {
            let position = index + 1;
            if filter.as_ref().is_some_and(|f| f.is_excluded(row)) {
                debug!(row = position, "row excluded by marker");
                summary.record_excluded();
                continue;
            }
            let Some(mut record) = self.normalize(row, &map) else {
                debug!(row = position, "row has no identity value; skipping");
                summary.record(position, "", &SyncOutcome::SkippedInvalid);
                continue;
            };
            self.enrich(&mut record);
            let identity = reconciler
                .identity_of(&record)
                .map(|(_, value)| value.to_string())
                .unwrap_or_default();
            let outcome = reconciler.reconcile(&record, self.options.relation_id.as_deref());
            match &outcome {
                SyncOutcome::Failed(reason) => {
                    warn!(
                        row = position,
                        identity = %identity,
                        reason = %reason,
                        "row failed"
                    );
                }
                outcome => {
                    debug!(row = position, identity = %identity, outcome = outcome.label(), "row done");
                }
            }
            summary.record(position, &identity, &outcome);
        }

        info!(
            created = summary.created,
            updated = summary.updated,
            unchanged = summary.skipped_unchanged,
            invalid = summary.skipped_invalid,
            excluded = summary.excluded,
            failed = summary.failed,
            "sync pass finished"
        );
        Ok(summary)
    }

    fn normalize(&self, row: &[String], map: &FieldMap) -> Option<CanonicalRecord> {
        normalize_row(row, map, self.spec)
    }

    /// Adds enrichment fields when an address is present and the lookup
    /// resolves. An unresolved lookup degrades the record, never the run.
    fn enrich(&self, record: &mut CanonicalRecord) {
        let (Some(geocoder), Some(mode)) = (self.geocoder, self.options.geo_mode) else {
            return;
        };
        let Some(field) = self.spec.address_field.as_deref() else {
            return;
        };
        let Some(address) = record.text(field).map(str::to_string) else {
            return;
        };
        match geocoder.resolve(&address, mode) {
            GeoResult::Coordinates { lat, lng } => {
                record.insert(LATITUDE_FIELD, FieldValue::Number(lat));
                record.insert(LONGITUDE_FIELD, FieldValue::Number(lng));
            }
            GeoResult::District(name) => {
                record.insert(DISTRICT_FIELD, FieldValue::Text(name));
            }
            GeoResult::Unresolved => {
                debug!(address = %address, "address unresolved; record left unenriched");
            }
        }
    }
}
