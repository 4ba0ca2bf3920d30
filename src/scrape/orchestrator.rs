use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Span, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::config::{Config, DEFAULT_CONCURRENCY};
use crate::document::MarkupDocument;
use crate::entities::{ArticleStub, ExtractedArticle, ScrapeRunOutcome};
use crate::extractor::ContentExtractor;
use crate::fetcher::{Fetcher, PageResponse};
use crate::listing::links::same_page;
use crate::listing::{ListingExtractor, PaginationResolver};
use crate::scrape::errors::ScrapeError;
use crate::scrape::run_log::RunLogSink;
use crate::selection::SelectionPolicy;

const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(300);
const DEFAULT_LOG_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_LISTING_RETRIES: u32 = 1;
const DEFAULT_LISTING_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Stubs found on the listing page as first fetched, plus the URL of the
/// page selection should start from.
struct ListingRead {
    resolved_url: Url,
    stubs: Vec<ArticleStub>,
}

/// Drives one scrape: listing, pagination, selection, then article bodies.
pub struct ScrapeOrchestrator {
    fetcher: Arc<dyn Fetcher>,
    run_log: Arc<dyn RunLogSink>,
    listing: ListingExtractor,
    pagination: PaginationResolver,
    selection: SelectionPolicy,
    content: ContentExtractor,
    concurrency: usize,
    run_timeout: Duration,
    log_timeout: Duration,
    listing_retries: u32,
    listing_retry_delay: Duration,
}

impl ScrapeOrchestrator {
    pub fn new(fetcher: Arc<dyn Fetcher>, run_log: Arc<dyn RunLogSink>) -> Self {
        Self {
            fetcher,
            run_log,
            listing: ListingExtractor::default(),
            pagination: PaginationResolver::new(),
            selection: SelectionPolicy::default(),
            content: ContentExtractor::default(),
            concurrency: DEFAULT_CONCURRENCY,
            run_timeout: DEFAULT_RUN_TIMEOUT,
            log_timeout: DEFAULT_LOG_TIMEOUT,
            listing_retries: DEFAULT_LISTING_RETRIES,
            listing_retry_delay: DEFAULT_LISTING_RETRY_DELAY,
        }
    }

    pub fn from_config(
        config: &Config,
        fetcher: Arc<dyn Fetcher>,
        run_log: Arc<dyn RunLogSink>,
    ) -> Self {
        Self::new(fetcher, run_log)
            .with_listing(ListingExtractor::new(config.default_author()))
            .with_selection(SelectionPolicy::new(config.target_count()))
            .with_content(ContentExtractor::new(config.max_content_chars()))
            .with_concurrency(config.concurrency())
            .with_run_timeout(config.run_timeout())
    }

    pub fn with_listing(mut self, listing: ListingExtractor) -> Self {
        self.listing = listing;
        self
    }

    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_content(mut self, content: ContentExtractor) -> Self {
        self.content = content;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_run_timeout(mut self, run_timeout: Duration) -> Self {
        self.run_timeout = run_timeout;
        self
    }

    /// Upper bound for writing the run outcome.
    pub fn with_log_timeout(mut self, log_timeout: Duration) -> Self {
        self.log_timeout = log_timeout;
        self
    }

    /// Retry a retriable listing fetch failure up to `retries` times,
    /// waiting `delay` between attempts.
    pub fn with_listing_retries(mut self, retries: u32, delay: Duration) -> Self {
        self.listing_retries = retries;
        self.listing_retry_delay = delay;
        self
    }

    /// Scrape `listing_url` and record exactly one outcome for the run.
    ///
    /// Fails only when the listing page itself cannot be fetched or the run
    /// timeout elapses.
    #[instrument(skip_all, fields(listing_url = %listing_url, run_id = tracing::field::Empty))]
    pub async fn run(&self, listing_url: &str) -> Result<Vec<ExtractedArticle>, ScrapeError> {
        let run_id = Uuid::new_v4();
        Span::current().record("run_id", tracing::field::display(run_id));
        let started_at = Utc::now();

        let mut listing_attempts = 0;
        let scrape = self.scrape(listing_url, &mut listing_attempts);
        let result = match tokio::time::timeout(self.run_timeout, scrape).await {
            Ok(result) => result,
            Err(_) => Err(ScrapeError::RunTimeout(self.run_timeout)),
        };

        let outcome = match &result {
            Ok(articles) => ScrapeRunOutcome::success(run_id, listing_url, started_at, articles.len()),
            Err(e) => ScrapeRunOutcome::failure(run_id, listing_url, started_at, e.to_string()),
        }
        .with_listing_attempts(listing_attempts.max(1));

        match tokio::time::timeout(self.log_timeout, self.run_log.record(&outcome)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Failed to record run outcome"),
            Err(_) => warn!(timeout = ?self.log_timeout, "Recording run outcome timed out"),
        }

        result
    }

    async fn scrape(
        &self,
        listing_url: &str,
        listing_attempts: &mut u32,
    ) -> Result<Vec<ExtractedArticle>, ScrapeError> {
        let url = Url::parse(listing_url).map_err(|source| ScrapeError::InvalidListingUrl {
            url: listing_url.to_string(),
            source,
        })?;

        // 1. Listing page as given
        let listing_page = self.fetch_listing(&url, listing_attempts).await?;
        let original = self.read_listing(&listing_page);
        info!(
            stubs = original.stubs.len(),
            resolved_url = %original.resolved_url,
            charset = ?listing_page.charset,
            "Read listing page"
        );

        // 2. Last page, falling back to the original on any failure
        let (primary, backfill) = if same_page(&original.resolved_url, &listing_page.url_final) {
            (original.stubs, None)
        } else {
            match self.fetcher.fetch(original.resolved_url.as_str()).await {
                Ok(page) => {
                    let stubs = self.stubs_from(&page);
                    info!(stubs = stubs.len(), url = %page.url_final, "Read last listing page");
                    (stubs, Some(original.stubs))
                }
                Err(e) => {
                    warn!(error = %e, url = %original.resolved_url, "Last listing page unavailable; using first page");
                    (original.stubs, None)
                }
            }
        };

        // 3. Oldest articles first
        let selected = self.selection.select_with_backfill(primary, backfill);
        if self.selection.is_short(&selected) {
            warn!(
                selected = selected.len(),
                target = self.selection.target_count(),
                "Fewer articles than requested"
            );
        }
        info!(selected = selected.len(), "Selected articles");

        // 4. Article bodies, in selection order
        let articles = stream::iter(selected)
            .map(|stub| self.extract_article(stub))
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        Ok(articles)
    }

    /// The only fetch that can fail a run, so transient failures get a
    /// bounded retry.
    async fn fetch_listing(&self, url: &Url, attempts: &mut u32) -> Result<PageResponse, ScrapeError> {
        loop {
            *attempts += 1;
            match self.fetcher.fetch(url.as_str()).await {
                Ok(page) => return Ok(page),
                Err(e) if e.should_retry() && *attempts <= self.listing_retries => {
                    warn!(error = %e, attempt = *attempts, "Listing fetch failed; retrying");
                    tokio::time::sleep(self.listing_retry_delay).await;
                }
                Err(source) => {
                    return Err(ScrapeError::ListingFetch {
                        url: url.to_string(),
                        source,
                    });
                }
            }
        }
    }

    fn read_listing(&self, page: &PageResponse) -> ListingRead {
        let document = MarkupDocument::parse(&page.body_utf8);
        ListingRead {
            resolved_url: self.pagination.resolve(&page.url_final, &document),
            stubs: self.listing.extract(&document, &page.url_final),
        }
    }

    fn stubs_from(&self, page: &PageResponse) -> Vec<ArticleStub> {
        let document = MarkupDocument::parse(&page.body_utf8);
        self.listing.extract(&document, &page.url_final)
    }

    #[instrument(skip_all, fields(url = %stub.url))]
    async fn extract_article(&self, stub: ArticleStub) -> ExtractedArticle {
        let content = match self.fetcher.fetch(stub.url.as_str()).await {
            Ok(page) => self.content.extract(&page.body_utf8),
            Err(e) => {
                warn!(error = %e, timed_out = e.is_timeout(), "Article fetch failed; keeping listing excerpt");
                None
            }
        };
        ExtractedArticle::from_stub(stub, content)
    }
}
