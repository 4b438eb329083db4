//! Google-style geocoding lookup.
//!
//! One request per invocation, no retry, no backoff. Every failure mode
//! (transport, non-2xx, provider non-`OK` status, missing component)
//! degrades to [`GeoResult::Unresolved`]; enrichment is never fatal.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use rowsync_model::{GeoMode, GeoResult, Geocoder};

/// Geocoding API endpoint.
const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Address-component type tag for a second-level administrative area.
const DISTRICT_COMPONENT: &str = "administrative_area_level_2";

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeHit>,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    geometry: Option<Geometry>,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

/// Blocking geocoder against the Google Maps Geocoding API.
pub struct GoogleGeocoder {
    client: Client,
    api_key: String,
    region_suffix: Option<String>,
}

impl GoogleGeocoder {
    /// Creates a geocoder with the given API key.
    pub fn new(api_key: &str) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            region_suffix: None,
        })
    }

    /// Appends a region hint (e.g. a country name) to every address before
    /// lookup, matching how the source data was originally geocoded.
    #[must_use]
    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region_suffix = region.filter(|suffix| !suffix.trim().is_empty());
        self
    }

    fn query_address(&self, address: &str) -> String {
        match &self.region_suffix {
            Some(suffix) => format!("{address}, {suffix}"),
            None => address.to_string(),
        }
    }
}

impl Geocoder for GoogleGeocoder {
    fn resolve(&self, address: &str, mode: GeoMode) -> GeoResult {
        let query = self.query_address(address);
        debug!(address = %query, ?mode, "geocoding");
        let response = match self
            .client
            .get(GEOCODE_URL)
            .query(&[("address", query.as_str()), ("key", self.api_key.as_str())])
            .send()
        {
            Ok(response) => response,
            Err(err) => {
                warn!(address = %query, error = %err, "geocoding request failed");
                return GeoResult::Unresolved;
            }
        };
        if !response.status().is_success() {
            warn!(address = %query, status = %response.status(), "geocoding HTTP error");
            return GeoResult::Unresolved;
        }
        match response.json::<GeocodeResponse>() {
            Ok(body) => extract(&body, mode),
            Err(err) => {
                warn!(address = %query, error = %err, "geocoding response unreadable");
                GeoResult::Unresolved
            }
        }
    }
}

/// Pulls the requested data out of a provider response.
fn extract(response: &GeocodeResponse, mode: GeoMode) -> GeoResult {
    if response.status != "OK" {
        warn!(status = %response.status, "geocoding provider status");
        return GeoResult::Unresolved;
    }
    let Some(hit) = response.results.first() else {
        return GeoResult::Unresolved;
    };
    match mode {
        GeoMode::Coordinates => match &hit.geometry {
            Some(geometry) => GeoResult::Coordinates {
                lat: geometry.location.lat,
                lng: geometry.location.lng,
            },
            None => GeoResult::Unresolved,
        },
        GeoMode::District => hit
            .address_components
            .iter()
            .find(|component| component.types.iter().any(|tag| tag == DISTRICT_COMPONENT))
            .map(|component| GeoResult::District(component.long_name.clone()))
            .unwrap_or(GeoResult::Unresolved),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> GeocodeResponse {
        serde_json::from_str(
            r#"{
                "status": "OK",
                "results": [{
                    "geometry": { "location": { "lat": 6.9271, "lng": 79.8612 } },
                    "address_components": [
                        { "long_name": "Colombo", "types": ["locality", "political"] },
                        { "long_name": "Colombo District", "types": ["administrative_area_level_2", "political"] },
                        { "long_name": "Sri Lanka", "types": ["country", "political"] }
                    ]
                }]
            }"#,
        )
        .expect("parse response")
    }

    #[test]
    fn extracts_coordinates() {
        let result = extract(&sample_response(), GeoMode::Coordinates);
        assert_eq!(
            result,
            GeoResult::Coordinates {
                lat: 6.9271,
                lng: 79.8612
            }
        );
    }

    #[test]
    fn extracts_second_level_district() {
        let result = extract(&sample_response(), GeoMode::District);
        assert_eq!(result, GeoResult::District("Colombo District".to_string()));
    }

    #[test]
    fn non_ok_status_is_unresolved() {
        let response: GeocodeResponse =
            serde_json::from_str(r#"{"status":"ZERO_RESULTS","results":[]}"#).expect("parse");
        assert_eq!(extract(&response, GeoMode::Coordinates), GeoResult::Unresolved);
    }

    #[test]
    fn missing_district_component_is_unresolved() {
        let response: GeocodeResponse = serde_json::from_str(
            r#"{
                "status": "OK",
                "results": [{
                    "geometry": { "location": { "lat": 1.0, "lng": 2.0 } },
                    "address_components": [
                        { "long_name": "Sri Lanka", "types": ["country"] }
                    ]
                }]
            }"#,
        )
        .expect("parse");
        assert_eq!(extract(&response, GeoMode::District), GeoResult::Unresolved);
    }

    #[test]
    fn region_suffix_is_appended() {
        let geocoder = GoogleGeocoder::new("test-key")
            .expect("client")
            .with_region(Some("Sri Lanka".to_string()));
        assert_eq!(geocoder.query_address("Kandy"), "Kandy, Sri Lanka");

        let bare = GoogleGeocoder::new("test-key")
            .expect("client")
            .with_region(Some("  ".to_string()));
        assert_eq!(bare.query_address("Kandy"), "Kandy");
    }
}
