use crate::linking::LinkingSettings;
use crate::repository::StoreSchemas;
use crate::storage::RetryPolicy;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    File,
}

impl StoreBackend {
    fn from_env(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "file" | "fs" => Ok(Self::File),
            _ => Err(anyhow::anyhow!("RH_STORE_BACKEND must be one of: memory, file")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub schema_prefix: String,
    pub access_code_schema: String,
    pub case_schema: String,
    pub retry: RetryPolicy,
    pub store_backend: StoreBackend,
    pub store_path: PathBuf,
    pub workers: usize,
    pub survey: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            schema_prefix: "rh-local".to_string(),
            access_code_schema: "uac".to_string(),
            case_schema: "case".to_string(),
            retry: RetryPolicy::default(),
            store_backend: StoreBackend::File,
            store_path: PathBuf::from("./rh-data"),
            workers: 4,
            survey: "CENSUS".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let schema_prefix = env::var("RH_SCHEMA_PREFIX")
            .or_else(|_| env::var("GCP_PROJECT"))
            .unwrap_or(defaults.schema_prefix);

        let access_code_schema =
            env::var("RH_ACCESS_CODE_SCHEMA").unwrap_or(defaults.access_code_schema);
        let case_schema = env::var("RH_CASE_SCHEMA").unwrap_or(defaults.case_schema);

        let retry = RetryPolicy::new(
            parse_var("RH_RETRY_INITIAL_DELAY_MS", defaults.retry.initial_delay_ms)?,
            parse_var("RH_RETRY_MULTIPLIER", defaults.retry.multiplier)?,
            parse_var("RH_RETRY_MAX_DELAY_MS", defaults.retry.max_delay_ms)?,
            parse_var("RH_RETRY_MAX_ATTEMPTS", defaults.retry.max_attempts)?,
        );
        validate_retry(&retry)?;

        let store_backend = match env::var("RH_STORE_BACKEND") {
            Ok(raw) => StoreBackend::from_env(&raw)?,
            Err(_) => defaults.store_backend,
        };
        let store_path = env::var("RH_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.store_path);

        let workers = parse_var("RH_WORKERS", defaults.workers)?.max(1);
        let survey = env::var("RH_SURVEY").unwrap_or(defaults.survey);

        Ok(Self {
            schema_prefix,
            access_code_schema,
            case_schema,
            retry,
            store_backend,
            store_path,
            workers,
            survey,
        })
    }

    pub fn schemas(&self) -> StoreSchemas {
        StoreSchemas::new(&self.schema_prefix, &self.access_code_schema, &self.case_schema)
    }

    pub fn linking_settings(&self) -> LinkingSettings {
        LinkingSettings {
            survey: self.survey.clone(),
        }
    }
}

fn validate_retry(retry: &RetryPolicy) -> Result<()> {
    if retry.max_attempts == 0 {
        anyhow::bail!("RH_RETRY_MAX_ATTEMPTS must be at least 1");
    }
    if retry.multiplier.is_nan() || retry.multiplier < 1.0 {
        anyhow::bail!(
            "RH_RETRY_MULTIPLIER must be at least 1.0, got {}",
            retry.multiplier
        );
    }
    if retry.max_delay_ms < retry.initial_delay_ms {
        anyhow::bail!("RH_RETRY_MAX_DELAY_MS must not be below RH_RETRY_INITIAL_DELAY_MS");
    }
    Ok(())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{name} has invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
