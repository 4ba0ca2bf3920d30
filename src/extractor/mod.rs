//! Article body extraction.

pub mod cleaner;
pub mod model;
pub mod reader;

#[cfg(test)]
mod tests;

pub use model::{ContentSource, Extraction};

use tracing::debug;

use crate::document::MarkupDocument;

pub const DEFAULT_MAX_CONTENT_CHARS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentExtractor {
    max_chars: usize,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTENT_CHARS)
    }
}

impl ContentExtractor {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Main body text of an article page, or `None` for an empty page.
    pub fn extract(&self, markup: &str) -> Option<String> {
        self.extract_detailed(markup).map(|extraction| extraction.text)
    }

    pub fn extract_detailed(&self, markup: &str) -> Option<Extraction> {
        // 1. Strip chrome from a private parse
        let mut document = MarkupDocument::parse(markup);
        cleaner::strip_chrome(&mut document);

        // 2. Known content containers, then loose paragraphs, then everything
        let (text, source) = if let Some((selector, text)) = reader::from_container(&document) {
            (text, ContentSource::Container(selector))
        } else if let Some(text) = reader::from_paragraphs(&document) {
            (text, ContentSource::Paragraphs)
        } else {
            (reader::from_document(&document)?, ContentSource::Document)
        };

        let extraction = Extraction::new(text, source, self.max_chars);
        debug!(
            source = ?extraction.source,
            chars = extraction.text.chars().count(),
            truncated = extraction.truncated,
            "Extracted content"
        );
        Some(extraction)
    }
}
