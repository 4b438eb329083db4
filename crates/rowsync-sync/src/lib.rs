//! Reconciliation and orchestration for the rowsync pipeline.

pub mod driver;
pub mod reconcile;

pub use driver::{SyncDriver, SyncOptions};
pub use reconcile::{Reconciler, merge_relations};
