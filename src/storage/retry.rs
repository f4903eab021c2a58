use super::DocumentStore;
use crate::core::{Result, RhError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};

/// Exponential backoff applied to mutating store calls that hit contention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Delay after the first failed attempt, in milliseconds.
    pub initial_delay_ms: u64,
    /// Growth factor applied per further attempt. Values below 1.0 are
    /// treated as 1.0, so delays never shrink.
    pub multiplier: f64,
    /// Upper bound for any single delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Total attempts including the first one.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: 100,
            multiplier: 2.0,
            max_delay_ms: 2_000,
            max_attempts: 5,
        }
    }
}

impl RetryPolicy {
    pub fn new(initial_delay_ms: u64, multiplier: f64, max_delay_ms: u64, max_attempts: u32) -> Self {
        Self {
            initial_delay_ms,
            multiplier,
            max_delay_ms,
            max_attempts,
        }
    }

    /// Single attempt, no backoff.
    pub fn no_retry() -> Self {
        Self::new(0, 1.0, 0, 1)
    }

    pub fn initial_delay_ms(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn max_delay_ms(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Delay to wait after failed attempt `attempt` (1-based):
    /// `min(initial * multiplier^(attempt-1), max)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let factor = self.multiplier.max(1.0).powi(exponent);
        let raw = self.initial_delay_ms as f64 * factor;
        let capped = raw.min(self.max_delay_ms as f64);
        Duration::from_millis(capped.max(0.0) as u64)
    }
}

/// Where a retried call gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryContext<'a> {
    pub operation: &'static str,
    pub schema: &'a str,
    pub key: &'a str,
    pub attempts: u32,
}

/// Invoked once when a mutating call exhausts its attempts.
///
/// The wrapper always re-raises the final error after the hook returns; queue
/// consumers depend on that to get the message redelivered or dead-lettered.
pub trait RecoveryHook: Send + Sync {
    fn on_exhausted(&self, context: &RetryContext<'_>, err: &RhError);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingRecoveryHook;

impl RecoveryHook for LoggingRecoveryHook {
    fn on_exhausted(&self, context: &RetryContext<'_>, err: &RhError) {
        error!(
            operation = context.operation,
            schema = context.schema,
            key = context.key,
            attempts = context.attempts,
            error = %err,
            "document store retries exhausted"
        );
    }
}

/// Typed, contention-aware access to a `DocumentStore`.
///
/// `store` and `delete` are retried on `Contention` only. Reads are never
/// retried; a failed read fails the current operation.
#[derive(Clone)]
pub struct RetryableDocumentStore {
    inner: Arc<dyn DocumentStore>,
    policy: RetryPolicy,
    recovery: Arc<dyn RecoveryHook>,
}

impl RetryableDocumentStore {
    pub fn new(inner: Arc<dyn DocumentStore>, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            recovery: Arc::new(LoggingRecoveryHook),
        }
    }

    pub fn with_recovery_hook(mut self, recovery: Arc<dyn RecoveryHook>) -> Self {
        self.recovery = recovery;
        self
    }

    pub async fn store<T: Serialize + ?Sized>(&self, schema: &str, key: &str, value: &T) -> Result<()> {
        let document = serde_json::to_value(value).map_err(|err| {
            RhError::system(format!(
                "Failed to serialise document for schema '{schema}' key '{key}': {err}"
            ))
        })?;

        self.with_retry("store", schema, key, || {
            self.inner.store(schema, key, document.clone())
        })
        .await
    }

    pub async fn delete(&self, schema: &str, key: &str) -> Result<()> {
        self.with_retry("delete", schema, key, || self.inner.delete(schema, key))
            .await
    }

    pub async fn retrieve<T: DeserializeOwned>(&self, schema: &str, key: &str) -> Result<Option<T>> {
        let Some(document) = self.inner.retrieve(schema, key).await? else {
            return Ok(None);
        };
        serde_json::from_value(document).map(Some).map_err(|err| {
            RhError::system(format!(
                "Failed to deserialise document '{key}' in schema '{schema}': {err}"
            ))
        })
    }

    pub async fn search<T: DeserializeOwned>(
        &self,
        schema: &str,
        field_path: &str,
        value: &str,
    ) -> Result<Vec<T>> {
        let documents = self.inner.search(schema, field_path, value).await?;
        documents
            .into_iter()
            .map(|document| {
                let id = document
                    .get("id")
                    .and_then(|id| id.as_str())
                    .unwrap_or("<no id>")
                    .to_string();
                serde_json::from_value(document).map_err(|err| {
                    RhError::system(format!(
                        "Failed to deserialise document '{id}' in schema '{schema}' \
                         (search {field_path}={value}): {err}"
                    ))
                })
            })
            .collect()
    }

    async fn with_retry<F, Fut>(
        &self,
        operation: &'static str,
        schema: &str,
        key: &str,
        mut call: F,
    ) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1u32;
        loop {
            match call().await {
                Ok(()) => {
                    if attempt > 1 {
                        debug!(operation, schema, key, attempt, "store call succeeded after retry");
                    }
                    return Ok(());
                }
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) if attempt >= max_attempts => {
                    let context = RetryContext {
                        operation,
                        schema,
                        key,
                        attempts: attempt,
                    };
                    self.recovery.on_exhausted(&context, &err);
                    return Err(err);
                }
                Err(err) => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        operation,
                        attempt,
                        max_attempts,
                        schema,
                        key,
                        error = %err,
                        backoff_ms = delay.as_millis() as u64,
                        "retry on contention"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_grows_and_caps() {
        let policy = RetryPolicy::new(100, 2.0, 350, 5);
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(350));
        assert_eq!(policy.delay_for(10), Duration::from_millis(350));
    }

    #[test]
    fn test_fractional_multiplier() {
        let policy = RetryPolicy::new(100, 1.5, 10_000, 5);
        assert_eq!(policy.delay_for(3), Duration::from_millis(225));
    }

    #[test]
    fn test_shrinking_multiplier_holds_initial_delay() {
        let policy = RetryPolicy::new(100, 0.5, 1_000, 5);
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(4), Duration::from_millis(100));
    }

    #[test]
    fn test_builder_setters() {
        let policy = RetryPolicy::default()
            .initial_delay_ms(1)
            .multiplier(3.0)
            .max_delay_ms(5)
            .max_attempts(7);
        assert_eq!(policy, RetryPolicy::new(1, 3.0, 5, 7));
    }
}
