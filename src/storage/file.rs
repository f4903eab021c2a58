use super::{DocumentStore, field_matches, single_document, validate_schema_name};
use crate::core::{Result, RhError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::timeout;
use tracing::debug;

/// One stored document inside a schema file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentRecord {
    key: String,
    document: JsonValue,
}

/// Document store that keeps each schema in `<root>/<schema>.json`.
///
/// Every write rewrites the schema file through a temp file and rename. Writers
/// are serialised; a writer that cannot get in within `write_timeout` fails with
/// `Contention` so the retry wrapper can back off.
pub struct FileDocumentStore {
    root: PathBuf,
    write_lock: Mutex<()>,
    write_timeout: Duration,
}

impl FileDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
            write_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_write_timeout(mut self, write_timeout: Duration) -> Self {
        self.write_timeout = write_timeout;
        self
    }

    fn schema_path(&self, schema: &str) -> PathBuf {
        self.root.join(format!("{schema}.json"))
    }

    async fn acquire_write(&self, schema: &str, key: &str) -> Result<MutexGuard<'_, ()>> {
        timeout(self.write_timeout, self.write_lock.lock())
            .await
            .map_err(|_| {
                RhError::contention(format!(
                    "Write to schema '{}' key '{}' not admitted within {}ms",
                    schema,
                    key,
                    self.write_timeout.as_millis()
                ))
            })
    }

    async fn load(&self, schema: &str) -> Result<Vec<DocumentRecord>> {
        let path = self.schema_path(schema);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(RhError::system(format!(
                    "Failed to read schema file '{}': {}",
                    path.display(),
                    err
                )));
            }
        };
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|err| {
            RhError::system(format!(
                "Schema file '{}' is not a valid document list: {}",
                path.display(),
                err
            ))
        })
    }

    async fn save(&self, schema: &str, records: &[DocumentRecord]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(records)?;
        atomic_write(self.schema_path(schema), bytes).await
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn store(&self, schema: &str, key: &str, value: JsonValue) -> Result<()> {
        validate_schema_name(schema)?;
        let _guard = self.acquire_write(schema, key).await?;

        let mut records = self.load(schema).await?;
        records.retain(|record| record.key != key);
        records.push(DocumentRecord {
            key: key.to_string(),
            document: value,
        });
        self.save(schema, &records).await?;
        debug!(schema, key, "document stored");
        Ok(())
    }

    async fn retrieve(&self, schema: &str, key: &str) -> Result<Option<JsonValue>> {
        validate_schema_name(schema)?;
        let found = self
            .load(schema)
            .await?
            .into_iter()
            .filter(|record| record.key == key)
            .map(|record| record.document)
            .collect();
        single_document(schema, key, found)
    }

    async fn search(&self, schema: &str, field_path: &str, value: &str) -> Result<Vec<JsonValue>> {
        validate_schema_name(schema)?;
        Ok(self
            .load(schema)
            .await?
            .into_iter()
            .filter(|record| field_matches(&record.document, field_path, value))
            .map(|record| record.document)
            .collect())
    }

    async fn delete(&self, schema: &str, key: &str) -> Result<()> {
        validate_schema_name(schema)?;
        let _guard = self.acquire_write(schema, key).await?;

        let mut records = self.load(schema).await?;
        let before = records.len();
        records.retain(|record| record.key != key);
        if records.len() != before {
            self.save(schema, &records).await?;
            debug!(schema, key, "document deleted");
        }
        Ok(())
    }
}

async fn atomic_write(path: PathBuf, bytes: Vec<u8>) -> Result<()> {
    tokio::task::spawn_blocking(move || -> Result<()> {
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&parent).map_err(|err| {
            RhError::system(format!(
                "Failed to create directory '{}': {}",
                parent.display(),
                err
            ))
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|err| {
            RhError::system(format!(
                "Failed to replace '{}': {}",
                path.display(),
                err.error
            ))
        })?;
        Ok(())
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_documents_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = FileDocumentStore::new(dir.path());
            store.store("rh-case", "c1", json!({"id": "c1"})).await.unwrap();
        }
        let reopened = FileDocumentStore::new(dir.path());
        assert_eq!(
            reopened.retrieve("rh-case", "c1").await.unwrap(),
            Some(json!({"id": "c1"}))
        );
    }

    #[tokio::test]
    async fn test_duplicate_keys_on_disk_are_a_system_error() {
        let dir = tempdir().unwrap();
        let records = json!([
            {"key": "k", "document": {"v": 1}},
            {"key": "k", "document": {"v": 2}}
        ]);
        std::fs::write(dir.path().join("uac.json"), records.to_string()).unwrap();

        let store = FileDocumentStore::new(dir.path());
        let err = store.retrieve("uac", "k").await.unwrap_err();
        assert!(matches!(err, RhError::SystemError(_)));
    }

    #[tokio::test]
    async fn test_corrupt_schema_file_is_reported() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("uac.json"), "not json").unwrap();

        let store = FileDocumentStore::new(dir.path());
        let err = store.search("uac", "id", "x").await.unwrap_err();
        assert!(matches!(err, RhError::SystemError(msg) if msg.contains("uac.json")));
    }

    #[tokio::test]
    async fn test_blocked_writer_reports_contention() {
        let dir = tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path()).with_write_timeout(Duration::from_millis(10));

        let _held = store.write_lock.lock().await;
        let err = store.store("uac", "k", json!({})).await.unwrap_err();
        assert!(err.is_contention());
    }
}
