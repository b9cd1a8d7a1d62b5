//! Orchestrator module for the listings sync ingest.
//!
//! Coordinates the source, processor, and loader components in a single
//! linear pass: fetch a bounded batch, transform every record, then
//! atomically replace the index content. Any failure aborts the run; the
//! previous index content stays live in that case.

use tracing::{info, instrument};

use crate::errors::IngestError;
use crate::loader::SearchLoader;
use crate::processor::ListingProcessor;
use crate::source::ListingSource;
use listings_sync_repository::IndexSettings;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum number of source records fetched per run.
    pub fetch_limit: usize,
    /// Wait for synchronous-durable confirmation of the index swap.
    pub safe_replace: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            fetch_limit: 5000,
            safe_replace: true,
        }
    }
}

/// Orchestrator that coordinates one synchronization run.
///
/// The orchestrator:
/// - Validates the index backend before touching data
/// - Applies the canonical index settings
/// - Routes the fetched batch through the processor into the loader
pub struct Orchestrator<S: ListingSource> {
    source: S,
    processor: ListingProcessor,
    loader: SearchLoader,
    config: OrchestratorConfig,
}

impl<S: ListingSource> Orchestrator<S> {
    /// Create a new orchestrator with the given components.
    pub fn new(source: S, processor: ListingProcessor, loader: SearchLoader) -> Self {
        Self {
            source,
            processor,
            loader,
            config: OrchestratorConfig::default(),
        }
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        source: S,
        processor: ListingProcessor,
        loader: SearchLoader,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            source,
            processor,
            loader,
            config,
        }
    }

    /// Run one full synchronization pass.
    ///
    /// Blocks until the index swap has been confirmed (or a failure aborts
    /// the run). There is no retry and no partial submission: either the
    /// whole batch is published or the previous index content remains.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), IngestError> {
        info!(
            fetch_limit = self.config.fetch_limit,
            safe_replace = self.config.safe_replace,
            "Starting listings synchronization run"
        );

        // Halt before touching data if the backend misbehaves.
        self.loader.check_ready().await?;
        self.loader.configure(&IndexSettings::listings()).await?;

        let records = self.source.fetch(self.config.fetch_limit).await?;
        info!(record_count = records.len(), "Fetched source records");

        let documents = self.processor.process_batch(records)?;
        self.loader
            .replace_all(&documents, self.config.safe_replace)
            .await?;

        info!(
            document_count = documents.len(),
            "Synchronization run complete"
        );
        Ok(())
    }
}
