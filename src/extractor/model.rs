use serde::Serialize;

/// Which tier of the content extractor produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "tier", content = "selector", rename_all = "snake_case")]
pub enum ContentSource {
    Container(&'static str),
    Paragraphs,
    Document,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub text: String,
    pub source: ContentSource,
    pub truncated: bool,
}

impl Extraction {
    pub(crate) fn new(text: String, source: ContentSource, max_chars: usize) -> Self {
        let (text, truncated) = truncate_chars(text, max_chars);
        Self {
            text,
            source,
            truncated,
        }
    }
}

/// Cut `text` to at most `max_chars` characters.
pub fn truncate_chars(mut text: String, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            text.truncate(byte_index);
            (text, true)
        }
        None => (text, false),
    }
}
