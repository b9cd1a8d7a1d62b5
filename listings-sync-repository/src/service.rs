//! Search index service implementation.
//!
//! This module provides the main service for interacting with the search
//! index. It validates batch-level invariants - document identity and batch
//! size - before delegating to a `SearchIndexProvider`, so a malformed batch
//! never reaches the network.

use std::collections::HashSet;

use crate::config::SearchIndexServiceConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::settings::IndexSettings;
use listings_sync_shared::ListingDocument;

/// The main service for interacting with the search index.
///
/// This is the high-level API that application code should use. It provides
/// input validation and delegates to a `SearchIndexProvider` for actual
/// backend operations.
///
/// # Validated invariants
///
/// - every document carries a non-empty `objectID`;
/// - `objectID`s are unique across the batch (the replace is keyed on them);
/// - the batch does not exceed the configured maximum size.
pub struct SearchIndexService {
    provider: Box<dyn SearchIndexProvider>,
    config: SearchIndexServiceConfig,
}

impl SearchIndexService {
    /// Create a new SearchIndexService with default configuration.
    ///
    /// # Arguments
    ///
    /// * `provider` - A boxed implementation of `SearchIndexProvider`
    pub fn new(provider: Box<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchIndexServiceConfig::default(),
        }
    }

    /// Create a new SearchIndexService with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `provider` - A boxed implementation of `SearchIndexProvider`
    /// * `config` - Custom configuration for the service
    pub fn with_config(
        provider: Box<dyn SearchIndexProvider>,
        config: SearchIndexServiceConfig,
    ) -> Self {
        Self { provider, config }
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), SearchIndexError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(SearchIndexError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    /// Check that every document has a non-empty, batch-unique objectID.
    fn validate_identities(documents: &[ListingDocument]) -> Result<(), SearchIndexError> {
        let mut seen = HashSet::with_capacity(documents.len());
        for (position, doc) in documents.iter().enumerate() {
            if doc.object_id.is_empty() {
                return Err(SearchIndexError::validation(format!(
                    "document at position {} has an empty objectID",
                    position
                )));
            }
            if !seen.insert(doc.object_id.as_str()) {
                return Err(SearchIndexError::validation(format!(
                    "duplicate objectID {:?} in batch",
                    doc.object_id
                )));
            }
        }
        Ok(())
    }

    /// Validate the backend connection with a write-and-search round trip.
    ///
    /// Delegates to the provider's self-test; intended to run at startup so
    /// a misconfigured backend halts the job before production data is
    /// touched.
    pub async fn validate_connection(&self) -> Result<(), SearchIndexError> {
        self.provider.validate_connection().await
    }

    /// Apply index settings. Idempotent on the backend side.
    pub async fn apply_settings(&self, settings: &IndexSettings) -> Result<(), SearchIndexError> {
        self.provider.apply_settings(settings).await
    }

    /// Atomically replace the full index content with the given documents.
    ///
    /// Validates batch size and document identity first; a batch that fails
    /// validation is rejected in full and nothing is sent to the backend.
    ///
    /// # Arguments
    ///
    /// * `documents` - The full document set to publish
    /// * `safe` - Wait for synchronous-durable confirmation of the swap
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index now holds exactly `documents`
    /// * `Err(SearchIndexError::BatchSizeExceeded)` - If the batch is too big
    /// * `Err(SearchIndexError::ValidationError)` - If objectIDs are empty
    ///   or duplicated
    /// * `Err(SearchIndexError)` - If the backend operation fails
    pub async fn replace_all(
        &self,
        documents: &[ListingDocument],
        safe: bool,
    ) -> Result<(), SearchIndexError> {
        self.validate_batch_size(documents.len())?;
        Self::validate_identities(documents)?;
        self.provider.replace_all_objects(documents, safe).await
    }
}
