//! Geocoding enrichment for the rowsync pipeline.

pub mod google;

pub use google::GoogleGeocoder;
