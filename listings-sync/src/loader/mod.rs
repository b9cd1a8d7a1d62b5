//! Loader module for the listings sync ingest.
//!
//! Publishes transformed documents into the search index through the
//! `SearchIndexService`. Unlike an incremental indexer there is no pending
//! buffer: the job republishes the full document set once per run via an
//! atomic replace.

use tracing::{error, info, instrument};

use crate::errors::IngestError;
use listings_sync_repository::{IndexSettings, SearchIndexService};
use listings_sync_shared::ListingDocument;

/// Loader that publishes documents into the search index.
pub struct SearchLoader {
    service: SearchIndexService,
}

impl SearchLoader {
    /// Create a new search loader over the given service.
    pub fn new(service: SearchIndexService) -> Self {
        Self { service }
    }

    /// Verify the index backend is reachable and behaving.
    ///
    /// Runs the provider's write-and-search self-test. A validation failure
    /// here halts the run before any production data is touched.
    pub async fn check_ready(&self) -> Result<(), IngestError> {
        self.service.validate_connection().await?;
        Ok(())
    }

    /// Apply the index settings. Idempotent on the backend side.
    pub async fn configure(&self, settings: &IndexSettings) -> Result<(), IngestError> {
        self.service.apply_settings(settings).await?;
        Ok(())
    }

    /// Atomically replace the index content with the given documents.
    ///
    /// With `safe` set, returns only once the backend has durably published
    /// the swap. On failure the previous index content stays live - there is
    /// no partial commit.
    #[instrument(skip(self, documents), fields(document_count = documents.len()))]
    pub async fn replace_all(
        &self,
        documents: &[ListingDocument],
        safe: bool,
    ) -> Result<(), IngestError> {
        let count = documents.len();
        match self.service.replace_all(documents, safe).await {
            Ok(()) => {
                info!(document_count = count, "Index content replaced");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, document_count = count, "Failed to replace index content");
                Err(IngestError::loader(format!(
                    "failed to replace index with {} documents: {}",
                    count, e
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use listings_sync_repository::{SearchIndexError, SearchIndexProvider};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Mock search provider for testing.
    struct MockSearchProvider {
        replace_count: Arc<AtomicUsize>,
        fail_replace: bool,
    }

    #[async_trait]
    impl SearchIndexProvider for MockSearchProvider {
        async fn validate_connection(&self) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn apply_settings(&self, _settings: &IndexSettings) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn replace_all_objects(
            &self,
            _documents: &[ListingDocument],
            _safe: bool,
        ) -> Result<(), SearchIndexError> {
            if self.fail_replace {
                return Err(SearchIndexError::upload("backend unavailable"));
            }
            self.replace_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn loader(fail_replace: bool) -> (SearchLoader, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let provider = MockSearchProvider {
            replace_count: Arc::clone(&count),
            fail_replace,
        };
        (
            SearchLoader::new(SearchIndexService::new(Box::new(provider))),
            count,
        )
    }

    #[tokio::test]
    async fn test_replace_all_delegates_to_service() {
        let (loader, count) = loader(false);
        let docs = vec![ListingDocument::new("a"), ListingDocument::new("b")];

        loader.replace_all(&docs, true).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_replace_failure_surfaces_as_loader_error() {
        let (loader, _) = loader(true);
        let docs = vec![ListingDocument::new("a")];

        let err = loader.replace_all(&docs, true).await.unwrap_err();
        assert!(matches!(err, IngestError::LoaderError(_)));
    }

    #[tokio::test]
    async fn test_duplicate_ids_rejected_before_provider() {
        let (loader, count) = loader(false);
        let docs = vec![ListingDocument::new("a"), ListingDocument::new("a")];

        let err = loader.replace_all(&docs, true).await.unwrap_err();
        assert!(matches!(err, IngestError::LoaderError(_)));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
