use std::fs;

use crate::extractor::{ContentExtractor, ContentSource};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

#[test]
fn test_extract_article_container() {
    let extraction = ContentExtractor::default()
        .extract_detailed(&fixture("article.html"))
        .expect("article has content");

    assert_eq!(extraction.source, ContentSource::Container(".entry-content"));
    assert!(!extraction.truncated);

    let text = extraction.text;
    assert!(text.starts_with("Every support bot eventually meets a question"));
    assert!(text.contains("Hand off early"));
    assert!(text.contains("first paragraph of advice"));
    assert!(text.contains("second paragraph covers context"));

    // chrome and in-body widgets
    assert!(!text.contains("Share on Twitter"));
    assert!(!text.contains("Related:"));
    assert!(!text.contains("Copy link"));
    assert!(!text.contains("newsletter"));
    assert!(!text.contains("Great post"));
    assert!(!text.contains("Pricing"));
    assert!(!text.contains("trackPageView"));
}

#[test]
fn test_paragraph_fallback() {
    let extraction = ContentExtractor::default()
        .extract_detailed(&fixture("blog.html"))
        .expect("blog has paragraphs");

    assert_eq!(extraction.source, ContentSource::Paragraphs);
    assert_eq!(
        extraction.text,
        "Onboarding is the first conversation a customer has with your product after they pay.\n\n\
         Keep it focused on the single outcome they came for, and measure how long it takes to get there."
    );
}

#[test]
fn test_paragraph_fallback_joins_article_paragraphs() {
    let extraction = ContentExtractor::default()
        .extract_detailed(&fixture("paragraphs.html"))
        .expect("article has paragraphs");

    assert_eq!(extraction.source, ContentSource::Paragraphs);
    assert_eq!(
        extraction.text,
        "Calm teams write down the answer the second time a question comes up.\n\n\
         They keep one queue, so nobody has to guess where a ticket went.\n\n\
         Hand-offs carry the full history instead of a one-line summary.\n\n\
         Every week someone reads a random sample of closed tickets."
    );
}

fn entry_content_page(body_open: &str, body_close: &str) -> String {
    format!(
        r#"<html><body class="post-template">{body_open}
            <aside class="sidebar">Recent posts</aside>
            <div class="entry-content"><p>{}</p></div>
        {body_close}</body></html>"#,
        "Layout wrappers must never take the article body down with them. ".repeat(4)
    )
}

#[test]
fn test_layout_wrappers_survive_chrome_strip() {
    let pages = [
        entry_content_page("", "").replace("post-template", "post-template ast-right-sidebar"),
        entry_content_page(r#"<form id="aspnetForm" method="post">"#, "</form>"),
        entry_content_page(r#"<div class="site-content has-sidebar">"#, "</div>"),
    ];

    for page in &pages {
        let extraction = ContentExtractor::default()
            .extract_detailed(page)
            .expect("wrapped article still has content");

        assert_eq!(extraction.source, ContentSource::Container(".entry-content"));
        assert!(extraction.text.starts_with("Layout wrappers must never"));
        assert!(extraction.text.chars().count() > 200);
        assert!(!extraction.text.contains("Recent posts"));
    }
}

#[test]
fn test_short_container_falls_through() {
    let html = format!(
        r#"<html><body>
            <div class="entry-content"><p>Loading…</p></div>
            <article><p>{}</p></article>
        </body></html>"#,
        "A paragraph that carries the real article body. ".repeat(3)
    );
    let extraction = ContentExtractor::default().extract_detailed(&html).unwrap();

    assert_eq!(extraction.source, ContentSource::Paragraphs);
    assert!(extraction.text.starts_with("A paragraph that carries"));
}

#[test]
fn test_whole_document_fallback() {
    let extraction = ContentExtractor::default()
        .extract_detailed(&fixture("sparse.html"))
        .expect("sparse page still has text");

    assert_eq!(extraction.source, ContentSource::Document);
    assert!(extraction.text.starts_with("Coming soon"));
    assert!(extraction.text.contains("We are writing something new."));
    assert!(!extraction.text.contains("Home"));
    assert!(!extraction.text.contains("var x"));
}

#[test]
fn test_empty_page_has_no_content() {
    assert_eq!(ContentExtractor::default().extract(&fixture("empty.html")), None);
    assert_eq!(ContentExtractor::default().extract(""), None);
}

#[test]
fn test_content_is_truncated() {
    let html = format!(
        r#"<html><body><div class="post-content"><p>{}</p></div></body></html>"#,
        "ünïcode text ".repeat(50)
    );
    let extraction = ContentExtractor::new(40).extract_detailed(&html).unwrap();

    assert_eq!(extraction.source, ContentSource::Container(".post-content"));
    assert!(extraction.truncated);
    assert_eq!(extraction.text.chars().count(), 40);
}

#[test]
fn test_malformed_html() {
    let html = "<html><head><title>Broken</title><body><p>Unclosed tags<div>More content";
    let text = ContentExtractor::default().extract(html).unwrap();

    assert!(text.contains("Unclosed tags"));
    assert!(text.contains("More content"));
}

#[test]
fn test_extraction_is_idempotent() {
    let html = fixture("article.html");
    let extractor = ContentExtractor::default();
    assert_eq!(extractor.extract_detailed(&html), extractor.extract_detailed(&html));
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*") {
            let _ = ContentExtractor::default().extract(&html);
        }

        #[test]
        fn test_extract_respects_max_chars(html in ".*", max_chars in 1usize..200) {
            if let Some(text) = ContentExtractor::new(max_chars).extract(&html) {
                prop_assert!(text.chars().count() <= max_chars);
                prop_assert!(!text.is_empty());
            }
        }
    }
}
