//! Source module for the listings sync ingest.
//!
//! Defines the abstract record source and the JSON-export file
//! implementation.

mod json_export;

pub use json_export::JsonExportSource;

use async_trait::async_trait;

use crate::errors::IngestError;
use listings_sync_shared::SourceRecord;

/// Abstracts where source records come from.
///
/// The job performs exactly one bounded fetch per run. `limit` caps the
/// number of records returned - a genuinely capped read, not an unbounded
/// cursor discarded client-side.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch up to `limit` source records.
    async fn fetch(&self, limit: usize) -> Result<Vec<SourceRecord>, IngestError>;
}
