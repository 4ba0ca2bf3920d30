use scraper::ElementRef;
use std::sync::LazyLock;
use tracing::{debug, info};
use url::Url;

use crate::cascade::{NotFound, SelectorStrategy, first_success};
use crate::document::MarkupDocument;
use crate::entities::ArticleStub;
use crate::listing::{fallback, fields};

pub const DEFAULT_AUTHOR: &str = "Editorial Team";

/// Post-card containers, most site-specific first.
static CONTAINERS: LazyLock<Vec<SelectorStrategy>> = LazyLock::new(|| {
    SelectorStrategy::compile(&[
        ".elementor-post",
        ".post-card",
        ".blog-post",
        "article.post",
        ".type-post",
        ".post-item",
        ".blog-item",
        ".card--post",
        "article",
    ])
});

/// Turns a listing page into article stubs.
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    default_author: String,
}

impl Default for ListingExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_AUTHOR)
    }
}

impl ListingExtractor {
    pub fn new(default_author: impl Into<String>) -> Self {
        Self {
            default_author: default_author.into(),
        }
    }

    pub fn default_author(&self) -> &str {
        &self.default_author
    }

    /// Stubs from the first container strategy that yields any, else from
    /// a scan of blog-looking links. Links are absolute against `base_url`.
    pub fn extract(&self, document: &MarkupDocument, base_url: &Url) -> Vec<ArticleStub> {
        match first_success(&CONTAINERS, |strategy| self.from_containers(document, strategy, base_url)) {
            Ok(stubs) => stubs,
            Err(NotFound) => {
                let stubs = fallback::scan_links(document, base_url, &self.default_author);
                info!(count = stubs.len(), url = %base_url, "No known post containers; used link scan");
                stubs
            }
        }
    }

    fn from_containers(
        &self,
        document: &MarkupDocument,
        strategy: &SelectorStrategy,
        base_url: &Url,
    ) -> Result<Vec<ArticleStub>, NotFound> {
        let stubs: Vec<ArticleStub> = document
            .select(&strategy.selector)
            .filter_map(|container| self.stub_from(&container, base_url))
            .collect();

        if stubs.is_empty() {
            return Err(NotFound);
        }
        debug!(strategy = strategy.name, count = stubs.len(), "Matched post containers");
        Ok(stubs)
    }

    fn stub_from(&self, container: &ElementRef<'_>, base_url: &Url) -> Option<ArticleStub> {
        let (title, url) = fields::title_and_link(container, base_url).ok()?;

        Some(ArticleStub {
            title,
            url,
            author: fields::author(container).or_else(|| Some(self.default_author.clone())),
            published_at: fields::published_at(container),
            excerpt: fields::excerpt(container),
        })
    }
}
