//! Record store transport for the rowsync pipeline.

pub mod client;

pub use client::StoreClient;
