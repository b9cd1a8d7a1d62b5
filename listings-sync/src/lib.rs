//! # Listings Sync
//!
//! Batch synchronization job for the listings search index: reads listing
//! records from a document export, transforms each into a denormalized
//! search document, and atomically republishes the full document set into
//! the hosted search index.
//!
//! ## Architecture
//!
//! The job follows the Source-Processor-Loader pattern:
//!
//! 1. **Source**: Fetches a bounded batch of source records
//! 2. **Processor**: Transforms records into search documents
//! 3. **Loader**: Replaces the index content with the documents
//! 4. **Orchestrator**: Coordinates the single-pass run
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`source`]: Source record fetching
//! - [`processor`]: Transforms records into documents
//! - [`loader`]: Publishes documents into the search index
//! - [`orchestrator`]: Coordinates the run
//! - [`errors`]: Error types for the job

pub mod config;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod source;

pub use config::Dependencies;
pub use errors::IngestError;

use thiserror::Error;

/// Errors that can occur during job initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
