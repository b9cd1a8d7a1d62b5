//! JSON-export file source.
//!
//! Reads listing records from a document-database export file. Both export
//! shapes are accepted: a single JSON array of documents, or one JSON object
//! per line (the shape `mongoexport` produces). Extended-JSON values inside
//! the documents (`$numberDecimal`, `$oid`, ...) are kept as-is; coercion
//! happens later at the transformation boundary.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument};

use crate::errors::IngestError;
use crate::source::ListingSource;
use listings_sync_shared::SourceRecord;

/// File-backed record source.
pub struct JsonExportSource {
    path: PathBuf,
}

impl JsonExportSource {
    /// Create a source reading from the given export file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse raw export text into at most `limit` JSON values.
    fn parse_export(raw: &str, limit: usize) -> Result<Vec<Value>, IngestError> {
        if raw.trim_start().starts_with('[') {
            let values: Vec<Value> = serde_json::from_str(raw)
                .map_err(|e| IngestError::parse(format!("invalid JSON array export: {}", e)))?;
            Ok(values.into_iter().take(limit).collect())
        } else {
            raw.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .take(limit)
                .enumerate()
                .map(|(line_no, line)| {
                    serde_json::from_str(line).map_err(|e| {
                        IngestError::parse(format!("invalid JSON on export line {}: {}", line_no + 1, e))
                    })
                })
                .collect()
        }
    }
}

#[async_trait]
impl ListingSource for JsonExportSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self, limit: usize) -> Result<Vec<SourceRecord>, IngestError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            IngestError::source(format!("cannot read export {}: {}", self.path.display(), e))
        })?;

        let values = Self::parse_export(&raw, limit)?;
        let records = values
            .into_iter()
            .enumerate()
            .map(|(position, value)| {
                SourceRecord::try_from(value).map_err(|_| {
                    IngestError::parse(format!(
                        "export entry {} is not a JSON object",
                        position + 1
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(record_count = records.len(), limit = limit, "Fetched source records");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_export(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("listings-sync-test-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).expect("write temp export");
        path
    }

    #[tokio::test]
    async fn test_fetch_ndjson_export() {
        let path = temp_export(
            "ndjson",
            "{\"_id\": \"a\", \"price\": 10}\n{\"_id\": \"b\"}\n\n{\"_id\": \"c\"}\n",
        );
        let source = JsonExportSource::new(&path);

        let records = source.fetch(10).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].identifier(), Some("a".to_string()));

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_fetch_array_export() {
        let path = temp_export("array", r#"[{"_id": "a"}, {"_id": "b"}]"#);
        let source = JsonExportSource::new(&path);

        let records = source.fetch(10).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].identifier(), Some("b".to_string()));

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_fetch_caps_at_limit() {
        let lines: String = (0..20).map(|i| format!("{{\"_id\": \"{}\"}}\n", i)).collect();
        let path = temp_export("capped", &lines);
        let source = JsonExportSource::new(&path);

        let records = source.fetch(5).await.unwrap();
        assert_eq!(records.len(), 5);

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_source_error() {
        let source = JsonExportSource::new("/nonexistent/listings.json");
        let err = source.fetch(5).await.unwrap_err();
        assert!(matches!(err, IngestError::SourceError(_)));
    }

    #[tokio::test]
    async fn test_fetch_non_object_entry_is_parse_error() {
        let path = temp_export("scalars", "{\"_id\": \"a\"}\n42\n");
        let source = JsonExportSource::new(&path);

        let err = source.fetch(10).await.unwrap_err();
        assert!(matches!(err, IngestError::ParseError(_)));

        std::fs::remove_file(path).ok();
    }
}
