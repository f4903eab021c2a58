//! Schema-less document storage.
//!
//! # Architecture
//!
//! - `DocumentStore` - async contract over already-serialised JSON documents
//! - `memory.rs` - in-process backend
//! - `file.rs` - one JSON file per schema, atomically rewritten
//! - `retry.rs` - contention-aware retry wrapper and typed access

mod file;
mod memory;
mod retry;

pub use file::FileDocumentStore;
pub use memory::InMemoryDocumentStore;
pub use retry::{
    LoggingRecoveryHook, RecoveryHook, RetryContext, RetryPolicy, RetryableDocumentStore,
};

use crate::core::{Result, RhError};
use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// Point read/write, delete and field-path search keyed by schema and key.
///
/// Every operation may fail with `RhError::Contention` when the backend aborts
/// under load, or `RhError::SystemError` for anything else.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Upserts `value` under `key`, overwriting unconditionally.
    async fn store(&self, schema: &str, key: &str, value: JsonValue) -> Result<()>;

    /// Exact key lookup. Absence is `Ok(None)`, not an error.
    async fn retrieve(&self, schema: &str, key: &str) -> Result<Option<JsonValue>>;

    /// Every document whose field at the dotted `field_path` equals `value`.
    async fn search(&self, schema: &str, field_path: &str, value: &str) -> Result<Vec<JsonValue>>;

    /// Removes the document if present. Deleting a missing key is a no-op.
    async fn delete(&self, schema: &str, key: &str) -> Result<()>;
}

/// Resolves the documents a backend returned for a single key.
///
/// More than one document for a key means the backing store is corrupt.
pub fn single_document(schema: &str, key: &str, mut found: Vec<JsonValue>) -> Result<Option<JsonValue>> {
    match found.len() {
        0 => Ok(None),
        1 => Ok(found.pop()),
        n => Err(RhError::system(format!(
            "Found {n} documents in schema '{schema}' for key '{key}', expected at most one"
        ))),
    }
}

/// Walks a dotted path (`address.uprn`) into a document.
pub fn field_at<'a>(document: &'a JsonValue, field_path: &str) -> Option<&'a JsonValue> {
    field_path
        .split('.')
        .try_fold(document, |current, segment| current.get(segment))
}

/// Scalar comparison used by field-path search.
pub fn field_matches(document: &JsonValue, field_path: &str, value: &str) -> bool {
    match field_at(document, field_path) {
        Some(JsonValue::String(s)) => s == value,
        Some(JsonValue::Number(n)) => n.to_string() == value,
        Some(JsonValue::Bool(b)) => b.to_string() == value,
        _ => false,
    }
}

/// Schema names end up as file names, so only `[a-z0-9_-]` is accepted.
pub fn validate_schema_name(schema: &str) -> Result<()> {
    if schema.is_empty() {
        return Err(RhError::system("Schema name must not be empty"));
    }
    if !schema
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(RhError::system(format!("Invalid schema name '{schema}'")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_path_walks_nested_objects() {
        let doc = json!({"id": "c1", "address": {"uprn": "100", "level": {"code": "U"}}});
        assert_eq!(field_at(&doc, "address.uprn"), Some(&json!("100")));
        assert_eq!(field_at(&doc, "address.level.code"), Some(&json!("U")));
        assert_eq!(field_at(&doc, "address.missing"), None);
        assert_eq!(field_at(&doc, "id.nested"), None);
    }

    #[test]
    fn test_field_matches_scalars() {
        let doc = json!({"uprn": 100, "active": true, "name": "x", "list": [1]});
        assert!(field_matches(&doc, "uprn", "100"));
        assert!(field_matches(&doc, "active", "true"));
        assert!(field_matches(&doc, "name", "x"));
        assert!(!field_matches(&doc, "list", "[1]"));
        assert!(!field_matches(&doc, "absent", "x"));
    }

    #[test]
    fn test_single_document_rejects_duplicates() {
        assert_eq!(single_document("s", "k", vec![]).unwrap(), None);
        assert_eq!(
            single_document("s", "k", vec![json!(1)]).unwrap(),
            Some(json!(1))
        );
        let err = single_document("s", "k", vec![json!(1), json!(2)]).unwrap_err();
        assert!(matches!(err, RhError::SystemError(msg) if msg.contains("Found 2 documents")));
    }

    #[test]
    fn test_schema_names() {
        assert!(validate_schema_name("rh-prod-uac").is_ok());
        assert!(validate_schema_name("").is_err());
        assert!(validate_schema_name("RH").is_err());
        assert!(validate_schema_name("../etc").is_err());
    }
}
