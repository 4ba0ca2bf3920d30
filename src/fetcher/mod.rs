pub mod client;
pub mod errors;
pub mod pipeline;
pub mod types;

pub use client::{BROWSER_USER_AGENT, Fetcher, FetcherConfig, HttpFetcher};
pub use errors::FetchError;
pub use types::{Charset, PageResponse};
