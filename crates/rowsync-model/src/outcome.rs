//! Per-row sync outcomes and the run-level tally.

/// Result of reconciling one source row.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// A new remote record was created.
    Created,
    /// An existing remote record received a partial update.
    Updated,
    /// The remote record already satisfied the requested state; no write
    /// was issued.
    SkippedUnchanged,
    /// The row lacked all identity fields and never reached the store.
    SkippedInvalid,
    /// A store call failed; the reason is kept for manual replay.
    Failed(String),
}

impl SyncOutcome {
    /// Short label used in logs and the summary table.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::SkippedUnchanged => "unchanged",
            Self::SkippedInvalid => "invalid",
            Self::Failed(_) => "failed",
        }
    }
}

/// A row whose store call failed, with enough context to replay it.
#[derive(Debug, Clone)]
pub struct RowFailure {
    /// 1-based source row position.
    pub row: usize,
    /// Identity value of the record, when one was available.
    pub identity: String,
    /// Failure reason, including the store's response body.
    pub reason: String,
}

/// Aggregated outcome counts for one run. Owned exclusively by the sync
/// driver and updated only after each row's reconciler call returns.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Rows that created a new remote record.
    pub created: usize,
    /// Rows that updated an existing remote record.
    pub updated: usize,
    /// Rows already satisfied remotely.
    pub skipped_unchanged: usize,
    /// Rows rejected before reconciliation.
    pub skipped_invalid: usize,
    /// Rows excluded by the out-of-band marker before normalization.
    pub excluded: usize,
    /// Rows whose store call failed.
    pub failed: usize,
    /// Individual failures, in row order.
    pub failures: Vec<RowFailure>,
}

impl RunSummary {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one row's outcome.
    pub fn record(&mut self, row: usize, identity: &str, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Created => self.created += 1,
            SyncOutcome::Updated => self.updated += 1,
            SyncOutcome::SkippedUnchanged => self.skipped_unchanged += 1,
            SyncOutcome::SkippedInvalid => self.skipped_invalid += 1,
            SyncOutcome::Failed(reason) => {
                self.failed += 1;
                self.failures.push(RowFailure {
                    row,
                    identity: identity.to_string(),
                    reason: reason.clone(),
                });
            }
        }
    }

    /// Records a row excluded before normalization.
    pub fn record_excluded(&mut self) {
        self.excluded += 1;
    }

    /// Total rows seen, excluded rows included.
    pub fn total(&self) -> usize {
        self.created
            + self.updated
            + self.skipped_unchanged
            + self.skipped_invalid
            + self.excluded
            + self.failed
    }

    /// True when no row issued or would issue a mutation.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}
