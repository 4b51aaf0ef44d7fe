//! JSON record file query executor
//!
//! The query source names a JSON file holding either a list of records or a
//! `{"values": [...]}` object. Relative paths resolve against the base
//! directory.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;
use vc_calendar::{QueryExecutor, QueryResponse, QueryValue, records_from_values};

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    List(Vec<JsonValue>),
    Wrapped(QueryValue),
}

/// Executes "queries" by reading record files from disk
pub struct JsonFileExecutor {
    base: PathBuf,
}

impl JsonFileExecutor {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn resolve(&self, source: &str) -> PathBuf {
        let path = PathBuf::from(source.trim());
        if path.is_absolute() {
            path
        } else {
            self.base.join(path)
        }
    }
}

#[async_trait]
impl QueryExecutor for JsonFileExecutor {
    async fn query(&self, source: &str) -> QueryResponse {
        let path = self.resolve(source);
        debug!(path = %path.display(), "Reading record file");

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                return QueryResponse::failed(format!("Cannot read {}: {}", path.display(), e));
            }
        };

        match serde_json::from_str::<RecordFile>(&content) {
            Ok(RecordFile::List(values)) => QueryResponse::ok(records_from_values(values)),
            Ok(RecordFile::Wrapped(value)) => QueryResponse::ok(value.values),
            Err(e) => QueryResponse::failed(format!("Invalid record file {}: {}", path.display(), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_record_list() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("events.json"),
            r#"[
                {"text": "Team Meeting [[2025-03-15]]", "key": {"path": "test/file.md"}},
                {"text": "Original text", "value": {"start": "2025-03-20", "end": "2025-03-22"}}
            ]"#,
        )
        .unwrap();

        let executor = JsonFileExecutor::new(dir.path());
        let records = executor.query("events.json").await.into_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key["path"], "test/file.md");
        assert_eq!(records[1].payload_pattern().unwrap().spans(), 3);
    }

    #[tokio::test]
    async fn test_reads_wrapped_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wrapped.json");
        fs::write(&path, r#"{"values": [{"text": "a 2025-03-01"}]}"#).unwrap();

        let executor = JsonFileExecutor::new("/nonexistent");
        let response = executor.query(path.to_str().unwrap()).await;
        assert!(response.successful);
        assert_eq!(response.into_records().unwrap()[0].text, "a 2025-03-01");
    }

    #[tokio::test]
    async fn test_one_bad_row_keeps_the_rest() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("mixed.json"),
            r#"[
                {"text": null, "key": "bad.md"},
                {"text": 42},
                17,
                {"text": "ok 2025-03-15", "key": "good.md"}
            ]"#,
        )
        .unwrap();

        let executor = JsonFileExecutor::new(dir.path());
        let response = executor.query("mixed.json").await;
        assert!(response.successful);

        let events = vc_calendar::events_from_records(response.into_records().unwrap());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].display, "ok");
        assert_eq!(events[0].link, serde_json::json!("good.md"));
    }

    #[tokio::test]
    async fn test_failures_are_reported_in_band() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        let executor = JsonFileExecutor::new(dir.path());

        let missing = executor.query("missing.json").await;
        assert!(!missing.successful);
        assert!(missing.error.unwrap().starts_with("Cannot read"));

        let broken = executor.query("broken.json").await;
        assert!(!broken.successful);
        assert!(broken.error.unwrap().starts_with("Invalid record file"));
    }
}
