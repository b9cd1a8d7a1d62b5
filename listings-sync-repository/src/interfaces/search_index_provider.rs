//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different hosted backend implementations.

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::settings::IndexSettings;
use listings_sync_shared::ListingDocument;

/// Abstracts the underlying hosted search index implementation.
///
/// This trait defines the three operations the sync job needs from its index
/// backend. Implementations are injected into `SearchIndexService` to enable
/// dependency injection and easy testing with mock implementations.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error
/// handling across backend implementations.
///
/// # Note on document lifecycle
///
/// There are no per-document create/update/delete operations because the job
/// republishes the full document set on every run: `replace_all_objects`
/// atomically swaps the index content to exactly the given sequence. Old
/// documents not in the new sequence are removed; the index is never left in
/// a half-updated state.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Validate the backend connection with a write-and-search round trip.
    ///
    /// Saves a probe record, searches it back, and clears it again. Intended
    /// to be called during startup so a misconfigured backend halts the run
    /// before any production data is touched.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the probe record came back exactly as written
    /// * `Err(SearchIndexError::ValidationError)` - If the round trip
    ///   succeeded at the transport level but the probe was missing or
    ///   mismatched
    /// * `Err(SearchIndexError)` - If the backend could not be reached
    async fn validate_connection(&self) -> Result<(), SearchIndexError>;

    /// Apply index settings (searchable attributes, facets, ranking).
    ///
    /// Idempotent: reapplying identical settings is a no-op in effect.
    ///
    /// # Arguments
    ///
    /// * `settings` - The typed settings structure to apply
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the settings were accepted
    /// * `Err(SearchIndexError)` - If the operation fails
    async fn apply_settings(&self, settings: &IndexSettings) -> Result<(), SearchIndexError>;

    /// Atomically replace the full index content with the given documents.
    ///
    /// On completion the index reflects exactly the given sequence: old
    /// documents not present in it are gone. With `safe` set, the call only
    /// returns once the swap has been durably published by the backend.
    ///
    /// # Arguments
    ///
    /// * `documents` - The full document set to publish
    /// * `safe` - Wait for synchronous-durable confirmation of the swap
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index now holds exactly `documents`
    /// * `Err(SearchIndexError)` - If any step of the replace fails; the
    ///   previous index content remains live in that case
    async fn replace_all_objects(
        &self,
        documents: &[ListingDocument],
        safe: bool,
    ) -> Result<(), SearchIndexError>;
}
