//! Configuration resolution for the backfill service
//!
//! Priority: environment variables → TOML file → compiled defaults.
//! The resolved [`BackfillConfig`] is constructed once and passed into the
//! orchestrator; there is no process-wide configuration state.

use libris_common::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080/api/v1";
const DEFAULT_OUTPUT_PATH: &str = "isbn.csv";
const DEFAULT_CONVERTERS: usize = 4;
const DEFAULT_UPDATERS: usize = 2;
const DEFAULT_CHANNEL_CAPACITY: usize = 16;
const DEFAULT_MAX_PAGES: u32 = 10_000;

/// Retry policy for transient catalog-update failures.
///
/// `max_attempts == 1` means no retry. Only transient failures (transport
/// errors and 5xx responses) are retried; rejections are final.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay between attempts, in milliseconds.
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff_ms: 250,
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Backfill service configuration.
#[derive(Debug, Clone)]
pub struct BackfillConfig {
    /// Catalog API base, e.g. `http://127.0.0.1:8080/api/v1`.
    pub api_base_url: String,
    /// Path of the CSV ledger the sink appends to.
    pub output_path: PathBuf,
    /// Convert worker pool size.
    pub converters: usize,
    /// Update worker pool size.
    pub updaters: usize,
    /// Capacity of the channels between stages.
    pub channel_capacity: usize,
    /// Upper bound on catalog pages walked in one run.
    pub max_pages: u32,
    pub retry: RetryPolicy,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            converters: DEFAULT_CONVERTERS,
            updaters: DEFAULT_UPDATERS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            max_pages: DEFAULT_MAX_PAGES,
            retry: RetryPolicy::default(),
        }
    }
}

/// On-disk TOML configuration. Every field is optional; anything absent
/// falls through to the compiled default.
#[derive(Debug, Default, Deserialize)]
pub struct TomlConfig {
    pub api_base_url: Option<String>,
    pub output_path: Option<PathBuf>,
    pub converters: Option<usize>,
    pub updaters: Option<usize>,
    pub channel_capacity: Option<usize>,
    pub max_pages: Option<u32>,
    pub retry: Option<RetryPolicy>,
}

impl BackfillConfig {
    /// Resolve configuration with ENV → TOML → default priority.
    ///
    /// A missing TOML file is not an error; a present but unparseable one
    /// is.
    pub fn resolve(toml_path: Option<&Path>) -> Result<Self> {
        let file = match toml_path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str::<TomlConfig>(&content).map_err(|e| {
                    Error::Config(format!("cannot parse {}: {}", path.display(), e))
                })?
            }
            _ => TomlConfig::default(),
        };

        let defaults = Self::default();

        let config = Self {
            api_base_url: env_string("LIBRIS_API_BASE_URL")
                .or(file.api_base_url)
                .unwrap_or(defaults.api_base_url),
            output_path: env_string("LIBRIS_OUTPUT_PATH")
                .map(PathBuf::from)
                .or(file.output_path)
                .unwrap_or(defaults.output_path),
            converters: env_parse("LIBRIS_CONVERTERS")?
                .or(file.converters)
                .unwrap_or(defaults.converters),
            updaters: env_parse("LIBRIS_UPDATERS")?
                .or(file.updaters)
                .unwrap_or(defaults.updaters),
            channel_capacity: env_parse("LIBRIS_CHANNEL_CAPACITY")?
                .or(file.channel_capacity)
                .unwrap_or(defaults.channel_capacity),
            max_pages: env_parse("LIBRIS_MAX_PAGES")?
                .or(file.max_pages)
                .unwrap_or(defaults.max_pages),
            retry: file.retry.unwrap_or(defaults.retry),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(Error::Config("api_base_url must not be empty".to_string()));
        }
        if self.converters == 0 || self.updaters == 0 {
            return Err(Error::Config(
                "worker pool sizes must be at least 1".to_string(),
            ));
        }
        if self.channel_capacity == 0 {
            return Err(Error::Config(
                "channel_capacity must be at least 1".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env_string(name) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("cannot parse {name}={value}"))),
        None => Ok(None),
    }
}
