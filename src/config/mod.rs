//! Configuration handling for the scraper.
//!
//! Everything is read from environment variables with development defaults,
//! so a bare `quarry` invocation scrapes the default listing with the
//! default budget. The CLI may override a few values afterwards.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::extractor::DEFAULT_MAX_CONTENT_CHARS;
use crate::fetcher::{BROWSER_USER_AGENT, FetcherConfig};
use crate::listing::DEFAULT_AUTHOR;
use crate::selection::DEFAULT_TARGET_COUNT;

/// Environment variable names.
pub const ENV_LISTING_URL: &str = "QUARRY_LISTING_URL";
pub const ENV_TARGET_COUNT: &str = "QUARRY_TARGET_COUNT";
pub const ENV_CONCURRENCY: &str = "QUARRY_CONCURRENCY";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "QUARRY_FETCH_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "QUARRY_CONNECT_TIMEOUT_SECS";
pub const ENV_RUN_TIMEOUT_SECS: &str = "QUARRY_RUN_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "QUARRY_USER_AGENT";
pub const ENV_DEFAULT_AUTHOR: &str = "QUARRY_DEFAULT_AUTHOR";
pub const ENV_MAX_CONTENT_CHARS: &str = "QUARRY_MAX_CONTENT_CHARS";
pub const ENV_RUN_LOG_PATH: &str = "QUARRY_RUN_LOG_PATH";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Default development values used when environment variables are absent.
pub const DEFAULT_LISTING_URL: &str = "https://beyondchats.com/blogs/";
pub const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RUN_TIMEOUT_SECS: u64 = 300;

/// Scraper runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    listing_url: Url,
    target_count: usize,
    concurrency: usize,
    fetch_timeout: Duration,
    connect_timeout: Duration,
    run_timeout: Duration,
    user_agent: String,
    default_author: String,
    max_content_chars: usize,
    run_log_path: Option<PathBuf>,
    database_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listing_url: Url::parse(DEFAULT_LISTING_URL).expect("default listing URL is valid"),
            target_count: DEFAULT_TARGET_COUNT,
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            run_timeout: Duration::from_secs(DEFAULT_RUN_TIMEOUT_SECS),
            user_agent: BROWSER_USER_AGENT.to_string(),
            default_author: DEFAULT_AUTHOR.to_string(),
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            run_log_path: None,
            database_url: None,
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let listing_url = match var(ENV_LISTING_URL) {
            Some(raw) => parse_listing_url(&raw)?,
            None => defaults.listing_url,
        };

        let target_count = positive(
            ENV_TARGET_COUNT,
            parse_var(ENV_TARGET_COUNT, var(ENV_TARGET_COUNT))?.unwrap_or(DEFAULT_TARGET_COUNT),
        )?;
        let concurrency = positive(
            ENV_CONCURRENCY,
            parse_var(ENV_CONCURRENCY, var(ENV_CONCURRENCY))?.unwrap_or(DEFAULT_CONCURRENCY),
        )?;
        let max_content_chars = positive(
            ENV_MAX_CONTENT_CHARS,
            parse_var(ENV_MAX_CONTENT_CHARS, var(ENV_MAX_CONTENT_CHARS))?
                .unwrap_or(DEFAULT_MAX_CONTENT_CHARS),
        )?;

        let secs = |key: &'static str, default: u64| -> Result<Duration, ConfigError> {
            let secs = positive(key, parse_var(key, var(key))?.unwrap_or(default))?;
            Ok(Duration::from_secs(secs))
        };

        Ok(Self {
            listing_url,
            target_count,
            concurrency,
            fetch_timeout: secs(ENV_FETCH_TIMEOUT_SECS, DEFAULT_FETCH_TIMEOUT_SECS)?,
            connect_timeout: secs(ENV_CONNECT_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS)?,
            run_timeout: secs(ENV_RUN_TIMEOUT_SECS, DEFAULT_RUN_TIMEOUT_SECS)?,
            user_agent: var(ENV_USER_AGENT).unwrap_or(defaults.user_agent),
            default_author: var(ENV_DEFAULT_AUTHOR).unwrap_or(defaults.default_author),
            max_content_chars,
            run_log_path: var(ENV_RUN_LOG_PATH).map(PathBuf::from),
            database_url: var(ENV_DATABASE_URL),
        })
    }

    pub fn with_listing_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.listing_url = parse_listing_url(raw)?;
        Ok(self)
    }

    pub fn with_target_count(mut self, target_count: usize) -> Result<Self, ConfigError> {
        self.target_count = positive(ENV_TARGET_COUNT, target_count)?;
        Ok(self)
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Result<Self, ConfigError> {
        self.concurrency = positive(ENV_CONCURRENCY, concurrency)?;
        Ok(self)
    }

    /// Listing page the scrape starts from.
    pub fn listing_url(&self) -> &Url {
        &self.listing_url
    }
    /// How many articles a run should return.
    pub fn target_count(&self) -> usize {
        self.target_count
    }
    /// Article pages fetched at once.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
    /// Upper bound for a whole run, listing to last article.
    pub fn run_timeout(&self) -> Duration {
        self.run_timeout
    }
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
    /// Author recorded when a listing names none.
    pub fn default_author(&self) -> &str {
        &self.default_author
    }
    pub fn max_content_chars(&self) -> usize {
        self.max_content_chars
    }
    /// JSON-lines run log file, when enabled.
    pub fn run_log_path(&self) -> Option<&PathBuf> {
        self.run_log_path.as_ref()
    }
    /// PostgreSQL URL for the run log table, when enabled.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            user_agent: self.user_agent.clone(),
            connect_timeout: self.connect_timeout,
            request_timeout: self.fetch_timeout,
            ..FetcherConfig::default()
        }
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

fn parse_listing_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        field: ENV_LISTING_URL,
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidValue {
            field: ENV_LISTING_URL,
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

fn parse_var<T>(field: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|raw| {
        raw.parse::<T>().map_err(|e| ConfigError::InvalidValue {
            field,
            reason: format!("'{raw}': {e}"),
        })
    })
    .transpose()
}

fn positive<T>(field: &'static str, value: T) -> Result<T, ConfigError>
where
    T: PartialOrd + Default,
{
    if value > T::default() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: "must be at least 1".to_string(),
        })
    }
}
