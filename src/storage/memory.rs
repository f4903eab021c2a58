use super::{DocumentStore, field_matches, validate_schema_name};
use crate::core::Result;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// Process-local document store.
///
/// Documents are kept per schema in key order so search results are stable.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    schemas: RwLock<HashMap<String, BTreeMap<String, JsonValue>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents held under `schema`.
    pub async fn document_count(&self, schema: &str) -> usize {
        self.schemas
            .read()
            .await
            .get(schema)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    pub async fn list_schemas(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn store(&self, schema: &str, key: &str, value: JsonValue) -> Result<()> {
        validate_schema_name(schema)?;
        let mut schemas = self.schemas.write().await;
        schemas
            .entry(schema.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn retrieve(&self, schema: &str, key: &str) -> Result<Option<JsonValue>> {
        validate_schema_name(schema)?;
        let schemas = self.schemas.read().await;
        Ok(schemas.get(schema).and_then(|docs| docs.get(key)).cloned())
    }

    async fn search(&self, schema: &str, field_path: &str, value: &str) -> Result<Vec<JsonValue>> {
        validate_schema_name(schema)?;
        let schemas = self.schemas.read().await;
        let Some(docs) = schemas.get(schema) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .values()
            .filter(|doc| field_matches(doc, field_path, value))
            .cloned()
            .collect())
    }

    async fn delete(&self, schema: &str, key: &str) -> Result<()> {
        validate_schema_name(schema)?;
        let mut schemas = self.schemas.write().await;
        if let Some(docs) = schemas.get_mut(schema) {
            docs.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_store_overwrites_previous_value() {
        let store = InMemoryDocumentStore::new();
        store.store("uac", "k1", json!({"v": 1})).await.unwrap();
        store.store("uac", "k1", json!({"v": 2})).await.unwrap();

        assert_eq!(store.retrieve("uac", "k1").await.unwrap(), Some(json!({"v": 2})));
        assert_eq!(store.document_count("uac").await, 1);
    }

    #[tokio::test]
    async fn test_retrieve_missing_is_none() {
        let store = InMemoryDocumentStore::new();
        assert_eq!(store.retrieve("uac", "nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryDocumentStore::new();
        store.store("case", "c1", json!({"id": "c1"})).await.unwrap();
        store.delete("case", "c1").await.unwrap();
        store.delete("case", "c1").await.unwrap();
        store.delete("never-created", "c1").await.unwrap();
        assert_eq!(store.retrieve("case", "c1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_search_unknown_schema_is_empty() {
        let store = InMemoryDocumentStore::new();
        let found = store.search("case", "address.uprn", "1").await.unwrap();
        assert!(found.is_empty());
    }
}
