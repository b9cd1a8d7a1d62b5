//! # Listings Sync Shared
//!
//! This crate defines the shared data structures used across the listings
//! search synchronization job: the schema-optional source record, the
//! allow-listed search document, and the numeric coercion boundary.

pub mod types;

pub use types::listing_document::{GeoPoint, ListingDocument, ReviewScores};
pub use types::source_number::SourceNumber;
pub use types::source_record::SourceRecord;
