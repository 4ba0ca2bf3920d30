use scraper::Selector;
use std::sync::LazyLock;

use crate::cascade::SelectorStrategy;
use crate::document::MarkupDocument;
use crate::extractor::reader::CONTAINER_SELECTORS;

const CHROME_SELECTORS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "template",
    "iframe",
    "nav",
    "footer",
    "header",
    "aside",
    ".ad",
    ".ads",
    ".advertisement",
    ".sidebar",
    "#sidebar",
    "#secondary",
    ".widget-area",
    ".comments",
    "#comments",
    ".comment-respond",
    ".social-share",
    ".share-buttons",
    ".sharedaddy",
];

/// Widgets that only show up inside a post body.
const IN_BODY_SELECTORS: &[&str] = &[
    ".share",
    ".sharing",
    ".related-posts",
    ".post-tags",
    ".author-box",
    "button",
    "form",
];

/// Page wrappers the global pass must never detach.
const CONTENT_ROOTS: &[&str] = &["html", "body", "main", "article"];

static CHROME: LazyLock<Vec<SelectorStrategy>> =
    LazyLock::new(|| SelectorStrategy::compile(CHROME_SELECTORS));

static SCOPED: LazyLock<Vec<SelectorStrategy>> = LazyLock::new(|| {
    let names: Vec<&'static str> = CHROME_SELECTORS
        .iter()
        .chain(IN_BODY_SELECTORS)
        .copied()
        .collect();
    SelectorStrategy::compile(&names)
});

static PROTECTED: LazyLock<Selector> = LazyLock::new(|| {
    let list = CONTENT_ROOTS
        .iter()
        .chain(CONTAINER_SELECTORS)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    Selector::parse(&list).expect("built-in selector must parse")
});

/// Remove site chrome from a whole page. A match that is, or wraps, the
/// body or a content container stays.
pub fn strip_chrome(document: &mut MarkupDocument) -> usize {
    document.strip_except(&CHROME, &PROTECTED)
}

/// Remove chrome and in-body widgets from a cloned content container.
pub fn strip_scoped(fragment: &mut MarkupDocument) -> usize {
    fragment.strip(&SCOPED)
}
