//! Processor module for the listings sync ingest.
//!
//! Transforms source records into search documents.

mod listing_processor;
pub mod normalize;

pub use listing_processor::ListingProcessor;
