//! Search index error types.
//!
//! This module defines the unified error type for all search index
//! operations, covering both low-level backend errors (connection, HTTP,
//! serialization) and high-level application errors (validation, batch
//! limits). The `ValidationError` variant is deliberately distinct from
//! connectivity variants so a failed self-test can halt the run before any
//! production data is touched.

use thiserror::Error;

/// Unified errors from search index operations.
///
/// Used by the `SearchIndexProvider` trait and `SearchIndexService` for all
/// search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g., missing objectIDs, failed self-test round trip).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to reach the search index backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to apply index settings.
    #[error("Settings error: {0}")]
    SettingsError(String),

    /// Failed to upload a batch of documents.
    #[error("Upload error: {0}")]
    UploadError(String),

    /// Failed during the atomic index replace (copy or move operation).
    #[error("Replace error: {0}")]
    ReplaceError(String),

    /// A backend task did not complete.
    #[error("Task error: {0}")]
    TaskError(String),

    /// A search query against the index failed.
    #[error("Search error: {0}")]
    SearchError(String),

    /// Failed to parse a response from the search index backend.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize data for the search index backend.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Batch size exceeds configured maximum.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchSizeExceeded { provided: usize, max: usize },
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a settings error.
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::SettingsError(msg.into())
    }

    /// Create an upload error.
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::UploadError(msg.into())
    }

    /// Create a replace error.
    pub fn replace(msg: impl Into<String>) -> Self {
        Self::ReplaceError(msg.into())
    }

    /// Create a task error.
    pub fn task(msg: impl Into<String>) -> Self {
        Self::TaskError(msg.into())
    }

    /// Create a search error.
    pub fn search(msg: impl Into<String>) -> Self {
        Self::SearchError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a batch size exceeded error.
    pub fn batch_size_exceeded(provided: usize, max: usize) -> Self {
        Self::BatchSizeExceeded { provided, max }
    }
}
