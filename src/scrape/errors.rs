use std::time::Duration;
use thiserror::Error;

use crate::fetcher::FetchError;

/// Failures that end a run. Everything else degrades to a fallback.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid listing URL '{url}': {source}")]
    InvalidListingUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to fetch listing page {url}: {source}")]
    ListingFetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("run exceeded {0:?}")]
    RunTimeout(Duration),
}
