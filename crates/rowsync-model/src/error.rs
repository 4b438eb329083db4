//! Error types shared across pipeline crates.

use thiserror::Error;

/// Failures surfaced by a record store backend.
///
/// Lookup and mutation failures are row-scoped: the sync driver records
/// them as `Failed` outcomes and keeps processing. Only
/// authentication failures abort a run before any row is touched.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure (connection, timeout, malformed response).
    #[error("network error: {0}")]
    Network(String),

    /// The store rejected a request with a non-2xx status. The response
    /// body is carried verbatim for diagnostics and manual replay.
    #[error("store rejected request (status {status}): {body}")]
    Api {
        /// HTTP status code returned by the store.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Authentication failed or returned no usable session token.
    #[error("authentication failed: {0}")]
    Auth(String),
}

/// Result type alias for record store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
