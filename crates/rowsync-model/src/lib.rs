pub mod collection;
pub mod error;
pub mod geo;
pub mod outcome;
pub mod record;
pub mod store;

pub use collection::{CollectionSpec, FieldKind, FieldSpec, IdentitySpec};
pub use error::{StoreError, StoreResult};
pub use geo::{GeoMode, GeoResult, Geocoder};
pub use outcome::{RowFailure, RunSummary, SyncOutcome};
pub use record::{CanonicalRecord, FieldValue, RemoteRecord};
pub use store::{LookupMatch, RecordStore};
