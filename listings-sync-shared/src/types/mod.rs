//! Core data structures for the listings sync job.
//!
//! Re-exports the source record, the target listing document, and the
//! numeric coercion union.

pub mod listing_document;
pub mod source_number;
pub mod source_record;

pub use listing_document::{GeoPoint, ListingDocument, ReviewScores};
pub use source_number::SourceNumber;
pub use source_record::SourceRecord;
