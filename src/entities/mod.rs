use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

// --- Listing ---

/// Lightweight article reference discovered on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleStub {
    pub title: String,
    pub url: Url, // absolute; natural key within a run
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub excerpt: String,
}

/// A stub plus its resolved body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedArticle {
    pub title: String,
    pub url: Url,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub content: String,
}

impl ExtractedArticle {
    /// Build the final record, falling back to the excerpt and then the
    /// title when `content` is missing or blank.
    pub fn from_stub(stub: ArticleStub, content: Option<String>) -> Self {
        let content = content
            .filter(|text| !text.trim().is_empty())
            .or_else(|| Some(stub.excerpt.clone()).filter(|text| !text.trim().is_empty()))
            .unwrap_or_else(|| stub.title.clone());

        Self {
            title: stub.title,
            url: stub.url,
            author: stub.author,
            published_at: stub.published_at,
            content,
        }
    }
}

// --- Run log ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One record per orchestrator invocation. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRunOutcome {
    pub run_id: Uuid,
    pub listing_url: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub status: RunStatus,
    pub articles_found: usize,
    pub error_message: Option<String>,
    /// Listing fetch attempts, counting retries.
    pub listing_attempts: u32,
}

impl ScrapeRunOutcome {
    pub fn success(
        run_id: Uuid,
        listing_url: impl Into<String>,
        started_at: DateTime<Utc>,
        articles_found: usize,
    ) -> Self {
        Self {
            run_id,
            listing_url: listing_url.into(),
            started_at,
            completed_at: Utc::now(),
            status: RunStatus::Success,
            articles_found,
            error_message: None,
            listing_attempts: 1,
        }
    }

    pub fn failure(
        run_id: Uuid,
        listing_url: impl Into<String>,
        started_at: DateTime<Utc>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            run_id,
            listing_url: listing_url.into(),
            started_at,
            completed_at: Utc::now(),
            status: RunStatus::Error,
            articles_found: 0,
            error_message: Some(error_message.into()),
            listing_attempts: 1,
        }
    }

    pub fn with_listing_attempts(mut self, listing_attempts: u32) -> Self {
        self.listing_attempts = listing_attempts;
        self
    }
}
