//! Algolia provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! against the Algolia REST API. The atomic replace is implemented the way
//! the official API clients do it: copy the live index settings to a
//! temporary index, upload all documents there, then move the temporary
//! index over the live one so readers never observe a partial state.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::settings::IndexSettings;
use listings_sync_shared::ListingDocument;

/// Maximum number of documents per upload request.
const BATCH_CHUNK_SIZE: usize = 1000;

/// Interval between task-status polls.
const TASK_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Per-request HTTP timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// objectID of the probe record used by the connection self-test.
const PROBE_OBJECT_ID: &str = "connection-probe";

/// Search term used to find the probe record.
const PROBE_NAME: &str = "connection_probe";

/// Algolia provider implementation.
///
/// Holds an HTTP client pre-configured with the application credentials and
/// the name of the live index all operations target.
///
/// # Example
///
/// ```ignore
/// let provider = AlgoliaProvider::new("MYAPPID", "admin-key", "listings")?;
/// provider.validate_connection().await?;
/// provider.apply_settings(&IndexSettings::listings()).await?;
/// provider.replace_all_objects(&documents, true).await?;
/// ```
pub struct AlgoliaProvider {
    client: Client,
    base_url: Url,
    index: String,
}

impl AlgoliaProvider {
    /// Create a new Algolia provider for the given application and index.
    ///
    /// # Arguments
    ///
    /// * `app_id` - The Algolia application ID
    /// * `api_key` - An admin API key for the application
    /// * `index` - The live index name all operations target
    ///
    /// # Returns
    ///
    /// * `Ok(AlgoliaProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If client setup fails
    pub fn new(app_id: &str, api_key: &str, index: &str) -> Result<Self, SearchIndexError> {
        let base_url = Url::parse(&format!("https://{}.algolia.net", app_id))
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Algolia-Application-Id",
            HeaderValue::from_str(app_id)
                .map_err(|e| SearchIndexError::connection(e.to_string()))?,
        );
        headers.insert(
            "X-Algolia-API-Key",
            HeaderValue::from_str(api_key)
                .map_err(|e| SearchIndexError::connection(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        info!(app_id = %app_id, index = %index, "Created Algolia provider");

        Ok(Self {
            client,
            base_url,
            index: index.to_string(),
        })
    }

    /// Build the URL for an index-scoped endpoint.
    ///
    /// An empty suffix addresses the index itself; otherwise the suffix is a
    /// sub-resource such as `settings`, `batch`, or `task/123`.
    fn index_url(&self, index: &str, suffix: &str) -> Result<Url, SearchIndexError> {
        let path = if suffix.is_empty() {
            format!("/1/indexes/{}", index)
        } else {
            format!("/1/indexes/{}/{}", index, suffix)
        };
        self.base_url
            .join(&path)
            .map_err(|e| SearchIndexError::connection(e.to_string()))
    }

    /// Name of the temporary index used for one atomic replace.
    ///
    /// The nonce keeps concurrent runs (or leftovers from a crashed run)
    /// from colliding.
    fn scratch_index_name(index: &str) -> String {
        format!("{}_tmp_{}", index, Uuid::new_v4().simple())
    }

    /// Build the batch-upload body for one chunk of documents.
    fn batch_body(chunk: &[ListingDocument]) -> Result<Value, SearchIndexError> {
        let requests = chunk
            .iter()
            .map(|doc| {
                serde_json::to_value(doc)
                    .map(|body| json!({"action": "addObject", "body": body}))
                    .map_err(|e| SearchIndexError::serialization(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(json!({ "requests": requests }))
    }

    /// Check an HTTP response and parse its JSON body.
    async fn parse_response(
        response: Response,
        context: &str,
    ) -> Result<Value, SearchIndexError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::parse(format!(
                "{} failed with status {}: {}",
                context, status, body
            )));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(format!("{}: {}", context, e)))
    }

    /// Extract the task ID from a write-operation response.
    fn task_id(body: &Value, context: &str) -> Result<u64, SearchIndexError> {
        body.get("taskID")
            .and_then(Value::as_u64)
            .ok_or_else(|| SearchIndexError::parse(format!("{}: response carries no taskID", context)))
    }

    /// Block until the given task has been published on `index`.
    async fn wait_task(&self, index: &str, task_id: u64) -> Result<(), SearchIndexError> {
        let url = self.index_url(index, &format!("task/{}", task_id))?;
        loop {
            let response = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| SearchIndexError::task(e.to_string()))?;
            let body = Self::parse_response(response, "task status").await?;

            match body.get("status").and_then(Value::as_str) {
                Some("published") => {
                    debug!(index = %index, task_id = task_id, "Task published");
                    return Ok(());
                }
                Some(_) => sleep(TASK_POLL_INTERVAL).await,
                None => {
                    return Err(SearchIndexError::task(format!(
                        "task {} on {} reported no status",
                        task_id, index
                    )))
                }
            }
        }
    }

    /// Copy settings, synonyms, and rules of the live index to `destination`.
    async fn copy_index_scope(&self, destination: &str) -> Result<u64, SearchIndexError> {
        let url = self.index_url(&self.index, "operation")?;
        let response = self
            .client
            .post(url)
            .json(&json!({
                "operation": "copy",
                "destination": destination,
                "scope": ["settings", "synonyms", "rules"],
            }))
            .send()
            .await
            .map_err(|e| SearchIndexError::replace(e.to_string()))?;
        let body = Self::parse_response(response, "copy operation").await?;
        Self::task_id(&body, "copy operation")
    }

    /// Move `source` over the live index, atomically swapping the content.
    async fn move_index(&self, source: &str) -> Result<u64, SearchIndexError> {
        let url = self.index_url(source, "operation")?;
        let response = self
            .client
            .post(url)
            .json(&json!({
                "operation": "move",
                "destination": &self.index,
            }))
            .send()
            .await
            .map_err(|e| SearchIndexError::replace(e.to_string()))?;
        let body = Self::parse_response(response, "move operation").await?;
        Self::task_id(&body, "move operation")
    }

    /// Remove every record from the live index, waiting for publication.
    async fn clear_objects(&self) -> Result<(), SearchIndexError> {
        let url = self.index_url(&self.index, "clear")?;
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;
        let body = Self::parse_response(response, "clear objects").await?;
        let task = Self::task_id(&body, "clear objects")?;
        self.wait_task(&self.index, task).await
    }

    /// Save one record to the live index, waiting for publication.
    async fn save_object(&self, object_id: &str, record: &Value) -> Result<(), SearchIndexError> {
        let url = self.index_url(&self.index, object_id)?;
        let response = self
            .client
            .put(url)
            .json(record)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;
        let body = Self::parse_response(response, "save object").await?;
        let task = Self::task_id(&body, "save object")?;
        self.wait_task(&self.index, task).await
    }

    /// Run a plain query against the live index and return the hits.
    async fn search(&self, query: &str) -> Result<Vec<Value>, SearchIndexError> {
        let url = self.index_url(&self.index, "query")?;
        let response = self
            .client
            .post(url)
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(|e| SearchIndexError::search(e.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            // A query against a missing index is a connectivity-class
            // problem, not a validation mismatch.
            return Err(SearchIndexError::search(format!(
                "index {} does not exist",
                self.index
            )));
        }
        let body = Self::parse_response(response, "search").await?;
        match body.get("hits").and_then(Value::as_array) {
            Some(hits) => Ok(hits.clone()),
            None => Err(SearchIndexError::parse(
                "search response carries no hits".to_string(),
            )),
        }
    }
}

#[async_trait]
impl SearchIndexProvider for AlgoliaProvider {
    /// Validate the connection with a write-and-search round trip.
    ///
    /// Clears the index, saves a probe record, searches for it, clears
    /// again, and checks that exactly the probe came back. Runs before the
    /// data load, so the clears cannot lose anything the following
    /// replace-all would not overwrite anyway.
    async fn validate_connection(&self) -> Result<(), SearchIndexError> {
        self.clear_objects().await?;
        self.save_object(
            PROBE_OBJECT_ID,
            &json!({ "objectID": PROBE_OBJECT_ID, "name": PROBE_NAME }),
        )
        .await?;

        let hits = self.search(PROBE_NAME).await?;
        self.clear_objects().await?;

        let matched = hits.len() == 1
            && hits[0].get("objectID").and_then(Value::as_str) == Some(PROBE_OBJECT_ID);
        if matched {
            info!(index = %self.index, "Search index connection validated");
            Ok(())
        } else {
            Err(SearchIndexError::validation(format!(
                "connection probe round trip failed: expected exactly one hit with objectID {:?}, got {} hit(s)",
                PROBE_OBJECT_ID,
                hits.len()
            )))
        }
    }

    /// Apply index settings via `PUT {index}/settings`.
    async fn apply_settings(&self, settings: &IndexSettings) -> Result<(), SearchIndexError> {
        let url = self.index_url(&self.index, "settings")?;
        let response = self
            .client
            .put(url)
            .json(&settings.to_json())
            .send()
            .await
            .map_err(|e| SearchIndexError::settings(e.to_string()))?;
        Self::parse_response(response, "apply settings").await?;

        info!(index = %self.index, "Index settings applied");
        Ok(())
    }

    /// Atomically replace the full index content.
    ///
    /// Copy and upload tasks are always awaited: the final move must not
    /// outrun them. The move task itself is awaited only when `safe` is set.
    async fn replace_all_objects(
        &self,
        documents: &[ListingDocument],
        safe: bool,
    ) -> Result<(), SearchIndexError> {
        let scratch = Self::scratch_index_name(&self.index);
        info!(
            index = %self.index,
            scratch = %scratch,
            document_count = documents.len(),
            "Starting atomic index replace"
        );

        let copy_task = self.copy_index_scope(&scratch).await?;
        self.wait_task(&self.index, copy_task).await?;

        for chunk in documents.chunks(BATCH_CHUNK_SIZE) {
            let url = self.index_url(&scratch, "batch")?;
            let body = Self::batch_body(chunk)?;
            let response = self
                .client
                .post(url)
                .json(&body)
                .send()
                .await
                .map_err(|e| SearchIndexError::upload(e.to_string()))?;
            let body = Self::parse_response(response, "batch upload").await?;
            let task = Self::task_id(&body, "batch upload")?;
            self.wait_task(&scratch, task).await?;
            debug!(scratch = %scratch, chunk_size = chunk.len(), "Uploaded document chunk");
        }

        let move_task = self.move_index(&scratch).await?;
        if safe {
            // The move task is tracked on the destination index.
            self.wait_task(&self.index, move_task).await?;
        }

        info!(
            index = %self.index,
            document_count = documents.len(),
            "Index content replaced"
        );
        Ok(())
    }
}
