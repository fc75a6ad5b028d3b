use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    Http,
    Memory,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Sqlite => write!(f, "sqlite"),
            StoreKind::Http => write!(f, "http"),
            StoreKind::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StoreKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StoreKind::Sqlite),
            "http" => Ok(StoreKind::Http),
            "memory" => Ok(StoreKind::Memory),
            _ => Err(format!("Unknown embedding store: {s}. Expected: sqlite, http, or memory")),
        }
    }
}

/// Log output format, from `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {s}. Expected: pretty or json")),
        }
    }
}

/// Runtime settings, read once at startup from `COHORT_*` environment
/// variables.
#[derive(Debug, Clone)]
pub struct Settings {
    pub store: StoreKind,
    pub db_path: String,
    pub store_url: Option<String>,
    pub store_api_key: Option<String>,
    pub cache_ttl_secs: u64,
    pub allow_stale: bool,
    /// 0 sizes the worker pool to the available parallelism.
    pub workers: usize,
    pub request_timeout_secs: u64,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store: StoreKind::Sqlite,
            db_path: "./cohort.db".to_string(),
            store_url: None,
            store_api_key: None,
            cache_ttl_secs: 300,
            allow_stale: false,
            workers: 0,
            request_timeout_secs: 30,
            host: "0.0.0.0".to_string(),
            port: 8001,
            log_format: LogFormat::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup, falling back to the
    /// defaults for absent keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let defaults = Settings::default();
        Ok(Self {
            store: parse_or(&lookup, "COHORT_STORE", defaults.store)?,
            db_path: lookup("COHORT_DB").unwrap_or(defaults.db_path),
            store_url: lookup("COHORT_STORE_URL").filter(|s| !s.is_empty()),
            store_api_key: lookup("COHORT_STORE_API_KEY").filter(|s| !s.is_empty()),
            cache_ttl_secs: parse_or(&lookup, "COHORT_CACHE_TTL_SECS", defaults.cache_ttl_secs)?,
            allow_stale: parse_or(&lookup, "COHORT_ALLOW_STALE", defaults.allow_stale)?,
            workers: parse_or(&lookup, "COHORT_WORKERS", defaults.workers)?,
            request_timeout_secs: parse_or(
                &lookup,
                "COHORT_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            host: lookup("COHORT_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "COHORT_PORT", defaults.port)?,
            log_format: parse_or(&lookup, "LOG_FORMAT", defaults.log_format)?,
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| DomainError::InvalidArgument(format!("{key}={raw}: {e}"))),
    }
}
