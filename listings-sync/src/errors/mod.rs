//! Error types for the listings sync ingest.
//!
//! Every failure category is fatal to the run: the final write is an atomic
//! full replace, so aborting never leaves the index half-updated - either
//! the old content stays live or the new set is fully installed.

use thiserror::Error;

use listings_sync_repository::SearchIndexError;

/// Errors that can occur in the listings sync ingest.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Error fetching records from the source.
    #[error("Source error: {0}")]
    SourceError(String),

    /// A record is missing an expected nested field or has a wrong-shaped one.
    #[error("Structural error: {0}")]
    StructuralError(String),

    /// Error parsing or decoding data.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Error from the loader component.
    #[error("Loader error: {0}")]
    LoaderError(String),
}

impl IngestError {
    /// Create a source error.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }

    /// Create a structural error.
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::StructuralError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a loader error.
    pub fn loader(msg: impl Into<String>) -> Self {
        Self::LoaderError(msg.into())
    }
}

impl From<SearchIndexError> for IngestError {
    fn from(err: SearchIndexError) -> Self {
        Self::LoaderError(err.to_string())
    }
}
