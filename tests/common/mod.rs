#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use respondent_home::storage::RetryContext;
use respondent_home::{
    AccessCode, Address, CaseType, CollectionCase, DocumentStore, FormType, InMemoryDocumentStore,
    InMemoryEventPublisher, RecoveryHook, RespondentHome, Result, RetryPolicy, RhError,
    StoreSchemas,
};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

/// In-memory store that can be told to fail its next writes.
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryDocumentStore,
    failures_left: AtomicU32,
    writes_before_failure: AtomicU32,
    failure: Mutex<Option<RhError>>,
    pub store_calls: AtomicU32,
    pub delete_calls: AtomicU32,
    pub retrieve_calls: AtomicU32,
    pub search_calls: AtomicU32,
    fail_reads: Mutex<Option<RhError>>,
    write_delay_ms: AtomicU64,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `count` store/delete calls fail with `err`.
    pub fn fail_writes(&self, count: u32, err: RhError) {
        self.failures_left.store(count, Ordering::SeqCst);
        *self.failure.lock().unwrap() = Some(err);
    }

    /// Lets `skip` writes through, then fails the next `count`.
    pub fn fail_writes_after(&self, skip: u32, count: u32, err: RhError) {
        self.writes_before_failure.store(skip, Ordering::SeqCst);
        self.fail_writes(count, err);
    }

    /// Every store/delete call sleeps this long before it is applied.
    pub fn delay_writes(&self, delay: Duration) {
        self.write_delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, err: RhError) {
        *self.fail_reads.lock().unwrap() = Some(err);
    }

    pub fn store_calls(&self) -> u32 {
        self.store_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> u32 {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub async fn document_count(&self, schema: &str) -> usize {
        self.inner.document_count(schema).await
    }

    async fn write_delay(&self) {
        let delay_ms = self.write_delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    fn take_write_failure(&self) -> Option<RhError> {
        let left = self.failures_left.load(Ordering::SeqCst);
        if left == 0 {
            return None;
        }
        let skip = self.writes_before_failure.load(Ordering::SeqCst);
        if skip > 0 {
            self.writes_before_failure.store(skip - 1, Ordering::SeqCst);
            return None;
        }
        self.failures_left.store(left - 1, Ordering::SeqCst);
        self.failure.lock().unwrap().clone()
    }

    fn read_failure(&self) -> Option<RhError> {
        self.fail_reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn store(&self, schema: &str, key: &str, value: JsonValue) -> Result<()> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        self.write_delay().await;
        if let Some(err) = self.take_write_failure() {
            return Err(err);
        }
        self.inner.store(schema, key, value).await
    }

    async fn retrieve(&self, schema: &str, key: &str) -> Result<Option<JsonValue>> {
        self.retrieve_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.read_failure() {
            return Err(err);
        }
        self.inner.retrieve(schema, key).await
    }

    async fn search(&self, schema: &str, field_path: &str, value: &str) -> Result<Vec<JsonValue>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.read_failure() {
            return Err(err);
        }
        self.inner.search(schema, field_path, value).await
    }

    async fn delete(&self, schema: &str, key: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.write_delay().await;
        if let Some(err) = self.take_write_failure() {
            return Err(err);
        }
        self.inner.delete(schema, key).await
    }
}

/// Counts recovery-hook invocations.
#[derive(Default)]
pub struct CountingRecovery {
    pub fired: AtomicU32,
    pub last_attempts: AtomicU32,
}

impl CountingRecovery {
    pub fn fired(&self) -> u32 {
        self.fired.load(Ordering::SeqCst)
    }
}

impl RecoveryHook for CountingRecovery {
    fn on_exhausted(&self, context: &RetryContext<'_>, _err: &RhError) {
        self.fired.fetch_add(1, Ordering::SeqCst);
        self.last_attempts.store(context.attempts, Ordering::SeqCst);
    }
}

pub fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(1, 2.0, 4, max_attempts)
}

pub fn schemas() -> StoreSchemas {
    StoreSchemas::new("rh-test", "uac", "case")
}

pub struct Harness {
    pub store: Arc<FlakyStore>,
    pub publisher: Arc<InMemoryEventPublisher>,
    pub recovery: Arc<CountingRecovery>,
    pub home: RespondentHome,
}

pub fn harness() -> Harness {
    let store = Arc::new(FlakyStore::new());
    let publisher = Arc::new(InMemoryEventPublisher::new());
    let recovery = Arc::new(CountingRecovery::default());
    let home = RespondentHome::builder(store.clone())
        .publisher(publisher.clone())
        .schemas(schemas())
        .retry_policy(fast_retry(3))
        .recovery_hook(recovery.clone())
        .build();
    Harness {
        store,
        publisher,
        recovery,
        home,
    }
}

pub fn access_code(code_hash: &str, form_type: FormType, case_type: CaseType) -> AccessCode {
    AccessCode::new(code_hash, format!("q-{code_hash}"), form_type, case_type)
        .with_region("E")
        .with_collection_exercise_id("ce-2021")
}

pub fn case_at(id: &str, uprn: &str, case_type: CaseType, created_second: i64) -> CollectionCase {
    CollectionCase {
        id: id.to_string(),
        case_ref: Some(format!("ref-{id}")),
        survey: Some("CENSUS".to_string()),
        collection_exercise_id: Some("ce-2021".to_string()),
        address: Address {
            address_line1: Some("1 High Street".to_string()),
            town_name: Some("Exeter".to_string()),
            postcode: Some("EX1 1AA".to_string()),
            region: Some("E".to_string()),
            uprn: uprn.to_string(),
            ..Address::default()
        },
        case_type,
        address_invalid: false,
        created_date_time: Some(Utc.timestamp_opt(created_second, 0).unwrap()),
        hand_delivery: false,
        ce_expected_capacity: None,
    }
}
