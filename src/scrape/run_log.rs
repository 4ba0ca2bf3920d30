//! Run outcome sinks.
//!
//! The orchestrator writes exactly one [`ScrapeRunOutcome`] per run to a
//! [`RunLogSink`] and never reads it back.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::entities::{RunStatus, ScrapeRunOutcome};

#[derive(Debug, Error)]
pub enum RunLogError {
    #[error("run log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode run outcome: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("run log database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RunLogSink: Send + Sync {
    async fn record(&self, outcome: &ScrapeRunOutcome) -> Result<(), RunLogError>;
}

/// Emits each outcome as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRunLog;

#[async_trait]
impl RunLogSink for TracingRunLog {
    async fn record(&self, outcome: &ScrapeRunOutcome) -> Result<(), RunLogError> {
        let elapsed_ms = (outcome.completed_at - outcome.started_at).num_milliseconds();
        match outcome.status {
            RunStatus::Success => info!(
                run_id = %outcome.run_id,
                listing_url = %outcome.listing_url,
                articles_found = outcome.articles_found,
                listing_attempts = outcome.listing_attempts,
                elapsed_ms,
                "Scrape run succeeded"
            ),
            RunStatus::Error => warn!(
                run_id = %outcome.run_id,
                listing_url = %outcome.listing_url,
                error = outcome.error_message.as_deref().unwrap_or_default(),
                listing_attempts = outcome.listing_attempts,
                elapsed_ms,
                "Scrape run failed"
            ),
        }
        Ok(())
    }
}

/// Appends one JSON object per line to a file.
#[derive(Debug)]
pub struct JsonlRunLog {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonlRunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RunLogSink for JsonlRunLog {
    async fn record(&self, outcome: &ScrapeRunOutcome) -> Result<(), RunLogError> {
        let mut line = serde_json::to_vec(outcome)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Inserts outcomes into the `scraping_logs` table.
#[derive(Debug, Clone)]
pub struct PgRunLog {
    pool: PgPool,
}

impl PgRunLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, RunLogError> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl RunLogSink for PgRunLog {
    async fn record(&self, outcome: &ScrapeRunOutcome) -> Result<(), RunLogError> {
        let articles_found = i32::try_from(outcome.articles_found).unwrap_or(i32::MAX);
        let listing_attempts = i32::try_from(outcome.listing_attempts).unwrap_or(i32::MAX);

        sqlx::query(
            r#"
            INSERT INTO scraping_logs
                (run_id, listing_url, started_at, completed_at, status, articles_found, error_message, listing_attempts)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(outcome.run_id)
        .bind(&outcome.listing_url)
        .bind(outcome.started_at)
        .bind(outcome.completed_at)
        .bind(outcome.status.as_str())
        .bind(articles_found)
        .bind(outcome.error_message.as_deref())
        .bind(listing_attempts)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Keeps outcomes in memory.
#[derive(Debug, Default)]
pub struct MemoryRunLog {
    outcomes: Mutex<Vec<ScrapeRunOutcome>>,
}

impl MemoryRunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> Vec<ScrapeRunOutcome> {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RunLogSink for MemoryRunLog {
    async fn record(&self, outcome: &ScrapeRunOutcome) -> Result<(), RunLogError> {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(outcome.clone());
        Ok(())
    }
}

/// Writes to every inner sink, even after one fails, and reports the
/// first failure.
#[derive(Default, Clone)]
pub struct FanoutRunLog {
    sinks: Vec<Arc<dyn RunLogSink>>,
}

impl FanoutRunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn RunLogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl RunLogSink for FanoutRunLog {
    async fn record(&self, outcome: &ScrapeRunOutcome) -> Result<(), RunLogError> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.record(outcome).await {
                warn!(error = %e, "Run log sink failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
