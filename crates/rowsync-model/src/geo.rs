//! Geocoding result shapes and the lookup contract.

/// What the enricher should extract from a geocoding response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoMode {
    /// Latitude/longitude pair.
    Coordinates,
    /// Second-level administrative area name.
    District,
}

/// Outcome of one geocoding lookup. Never a partial coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoResult {
    /// Resolved latitude and longitude.
    Coordinates {
        /// Latitude in decimal degrees.
        lat: f64,
        /// Longitude in decimal degrees.
        lng: f64,
    },
    /// Resolved second-level administrative area name.
    District(String),
    /// The lookup failed or returned no usable data. The record simply
    /// lacks the enrichment fields; the run continues.
    Unresolved,
}

/// External address lookup contract.
///
/// Implementations issue exactly one request per invocation and never
/// retry; rate limiting toward the provider is the caller's concern.
pub trait Geocoder {
    /// Resolves a free-text address. Any transport or provider failure
    /// yields [`GeoResult::Unresolved`], never an error.
    fn resolve(&self, address: &str, mode: GeoMode) -> GeoResult;
}
