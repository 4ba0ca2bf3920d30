//! The three content tiers, tried in order by [`ContentExtractor`].
//!
//! [`ContentExtractor`]: crate::extractor::ContentExtractor

use scraper::Selector;
use std::sync::LazyLock;

use crate::cascade::{NotFound, SelectorStrategy, first_success};
use crate::document::{MarkupDocument, inline_text};
use crate::extractor::cleaner;

/// A container must hold more than this many characters.
const MIN_CONTAINER_CHARS: usize = 100;
const MIN_PARAGRAPH_CHARS: usize = 20;
const MIN_PARAGRAPHS_TOTAL_CHARS: usize = 100;

pub(crate) const CONTAINER_SELECTORS: &[&str] = &[
    ".elementor-widget-theme-post-content",
    ".entry-content",
    "article .content",
    ".post-content",
    "main article",
    ".article-content",
    "[itemprop='articleBody']",
    ".post-body",
];

static CONTAINERS: LazyLock<Vec<SelectorStrategy>> =
    LazyLock::new(|| SelectorStrategy::compile(CONTAINER_SELECTORS));

static BODY_PARAGRAPHS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("article p, .content p, main p, .post p").expect("built-in selector must parse")
});

/// Text of the first known content container that is long enough, along
/// with the selector that found it.
pub fn from_container(document: &MarkupDocument) -> Option<(&'static str, String)> {
    first_success(&CONTAINERS, |strategy| {
        let element = document.select(&strategy.selector).next().ok_or(NotFound)?;

        let mut fragment = MarkupDocument::fragment(&element);
        cleaner::strip_scoped(&mut fragment);
        let text = fragment.text();

        if text.chars().count() > MIN_CONTAINER_CHARS {
            Ok((strategy.name, text))
        } else {
            tracing::trace!(strategy = strategy.name, "Content container too short");
            Err(NotFound)
        }
    })
    .ok()
}

pub fn from_paragraphs(document: &MarkupDocument) -> Option<String> {
    let paragraphs: Vec<String> = document
        .select(&BODY_PARAGRAPHS)
        .map(|p| inline_text(&p))
        .filter(|text| text.chars().count() >= MIN_PARAGRAPH_CHARS)
        .collect();

    let joined = paragraphs.join("\n\n");
    (joined.chars().count() >= MIN_PARAGRAPHS_TOTAL_CHARS).then_some(joined)
}

pub fn from_document(document: &MarkupDocument) -> Option<String> {
    Some(document.text()).filter(|text| !text.is_empty())
}
