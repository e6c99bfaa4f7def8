//! Adapters for things outside the CSV tables: uploaded files and IP lookups.

pub mod blob_store;
pub mod geolocation;

pub use blob_store::{BlobStore, LocalBlobStore};
pub use geolocation::{GeoLocator, IpInfoLocator, Location};
