//! Configuration types for the SearchIndexService.

/// Configuration for the SearchIndexService.
///
/// Controls batch-level limits enforced before any network call reaches the
/// backend. The default maximum matches the hosted index's record limit the
/// sync job operates under.
#[derive(Debug, Clone)]
pub struct SearchIndexServiceConfig {
    /// Maximum number of documents allowed in a single replace operation.
    ///
    /// Set to `None` to disable the limit. Defaults to 10000 if not
    /// specified.
    pub max_batch_size: Option<usize>,
}

impl Default for SearchIndexServiceConfig {
    fn default() -> Self {
        Self {
            max_batch_size: Some(10_000),
        }
    }
}

impl SearchIndexServiceConfig {
    /// Create a config with no batch size limit.
    ///
    /// # Warning
    ///
    /// Use with caution. Removing the limit allows a replace that the hosted
    /// index will reject or truncate at its own quota.
    pub fn unlimited() -> Self {
        Self {
            max_batch_size: None,
        }
    }

    /// Create a config with a custom batch size limit.
    ///
    /// # Arguments
    ///
    /// * `max_batch_size` - Maximum number of documents in a single replace
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
        }
    }
}
