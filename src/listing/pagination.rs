//! Last-page discovery.
//!
//! Reverse-chronological blogs keep their oldest posts on the highest
//! numbered listing page, so that page is where selection starts.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use crate::cascade::SelectorStrategy;
use crate::document::{MarkupDocument, attr, inline_text};
use crate::listing::links::absolutize;

static PAGINATION_LINKS: LazyLock<Vec<SelectorStrategy>> = LazyLock::new(|| {
    SelectorStrategy::compile(&[
        "a.page-numbers",
        ".page-numbers a",
        ".pagination a",
        ".nav-links a",
        ".pager a",
        "a[href*='/page/']",
        "a[href*='page=']",
    ])
});

static PAGE_IN_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/page/(\d+)|[?&](?:page|paged)=(\d+)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
struct PageLink {
    number: u32,
    url: Url,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationResolver;

impl PaginationResolver {
    pub fn new() -> Self {
        Self
    }

    /// URL of the highest-numbered listing page, or `listing_url` itself
    /// when the page has no usable pagination.
    pub fn resolve(&self, listing_url: &Url, document: &MarkupDocument) -> Url {
        let mut last: Option<PageLink> = None;

        for strategy in PAGINATION_LINKS.iter() {
            for element in document.select(&strategy.selector) {
                let Some(href) = attr(&element, "href") else {
                    continue;
                };
                let Some(number) = page_number(&inline_text(&element), href) else {
                    continue;
                };
                let Some(url) = absolutize(listing_url, href) else {
                    continue;
                };

                // strict comparison keeps the first-seen link on ties
                if last.as_ref().is_none_or(|best| number > best.number) {
                    last = Some(PageLink { number, url });
                }
            }
        }

        match last {
            Some(link) => {
                debug!(page = link.number, url = %link.url, "Resolved last listing page");
                link.url
            }
            None => {
                debug!(url = %listing_url, "No pagination found; using listing page");
                listing_url.clone()
            }
        }
    }
}

/// Visible text first ("3"), then the page segment of the href.
fn page_number(text: &str, href: &str) -> Option<u32> {
    let digits: String = text.chars().filter(|c| !matches!(c, ',' | '.')).collect();
    if let Ok(number) = digits.trim().parse::<u32>() {
        return Some(number);
    }

    let captures = PAGE_IN_HREF.captures(href)?;
    captures
        .get(1)
        .or_else(|| captures.get(2))?
        .as_str()
        .parse()
        .ok()
}
