//! Dependency initialization and wiring for the listings sync job.

use std::env;

use tracing::info;

use crate::loader::SearchLoader;
use crate::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::processor::ListingProcessor;
use crate::source::JsonExportSource;
use crate::IndexingError;
use listings_sync_repository::{AlgoliaProvider, SearchIndexService};

/// Default search index name.
const DEFAULT_INDEX: &str = "listings";

/// Default path of the listings export file.
const DEFAULT_EXPORT_PATH: &str = "data/listings.json";

/// Default maximum number of records fetched per run.
const DEFAULT_FETCH_LIMIT: usize = 5000;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator<JsonExportSource>,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ALGOLIA_APP_ID`: Algolia application ID (required)
    /// - `ALGOLIA_ADMIN_API_KEY`: Algolia admin API key (required)
    /// - `ALGOLIA_INDEX`: Index name (default: "listings")
    /// - `LISTINGS_EXPORT_PATH`: Path of the listings export file
    ///   (default: data/listings.json)
    /// - `FETCH_LIMIT`: Maximum records fetched per run (default: 5000)
    /// - `SAFE_REPLACE`: Wait for durable swap confirmation, "true"/"false"
    ///   (default: true)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If required configuration is missing or the
    ///   provider cannot be constructed
    pub fn new() -> Result<Self, IndexingError> {
        let app_id = Self::required("ALGOLIA_APP_ID")?;
        let api_key = Self::required("ALGOLIA_ADMIN_API_KEY")?;
        let index = env::var("ALGOLIA_INDEX").unwrap_or_else(|_| DEFAULT_INDEX.to_string());
        let export_path =
            env::var("LISTINGS_EXPORT_PATH").unwrap_or_else(|_| DEFAULT_EXPORT_PATH.to_string());
        let fetch_limit = env::var("FETCH_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_FETCH_LIMIT);
        let safe_replace = env::var("SAFE_REPLACE")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(true);

        info!(
            index = %index,
            export_path = %export_path,
            fetch_limit = fetch_limit,
            safe_replace = safe_replace,
            "Initializing dependencies"
        );

        let provider = AlgoliaProvider::new(&app_id, &api_key, &index).map_err(|e| {
            IndexingError::config(format!("Failed to create Algolia provider: {}", e))
        })?;
        let service = SearchIndexService::new(Box::new(provider));
        let loader = SearchLoader::new(service);

        let source = JsonExportSource::new(export_path);
        let processor = ListingProcessor::new();

        let orchestrator = Orchestrator::with_config(
            source,
            processor,
            loader,
            OrchestratorConfig {
                fetch_limit,
                safe_replace,
            },
        );

        Ok(Self { orchestrator })
    }

    /// Read a required environment variable.
    fn required(name: &str) -> Result<String, IndexingError> {
        env::var(name)
            .map_err(|_| IndexingError::config(format!("{} must be set", name)))
            .and_then(|value| {
                if value.is_empty() {
                    Err(IndexingError::config(format!("{} must not be empty", name)))
                } else {
                    Ok(value)
                }
            })
    }
}
