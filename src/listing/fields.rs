//! Per-container field extraction.
//!
//! Every field has its own cascade and is resolved independently of the
//! others, so a theme that hides the author never costs us the title.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::cascade::{NotFound, SelectorStrategy, first_success};
use crate::document::{attr, inline_text};
use crate::listing::dates::parse_date;
use crate::listing::links::{absolutize, is_blog_post_link};

const MIN_EXCERPT_CHARS: usize = 20;
const MAX_AUTHOR_CHARS: usize = 50;

/// A title selector and the selector its link is read from.
pub(crate) struct TitleLinkPair {
    name: &'static str,
    title: Selector,
    link: Selector,
}

static TITLE_LINK_PAIRS: LazyLock<Vec<TitleLinkPair>> = LazyLock::new(|| {
    [
        (".elementor-post__title", ".elementor-post__read-more"),
        (".elementor-post__title", "a[href]"),
        (".entry-title", "a[href]"),
        (".post-title", "a[href]"),
        ("h2", "a[href]"),
        ("h3", "a[href]"),
        ("h1", "a[href]"),
    ]
    .into_iter()
    .map(|(title, link)| TitleLinkPair {
        name: title,
        title: Selector::parse(title).expect("built-in selector must parse"),
        link: Selector::parse(link).expect("built-in selector must parse"),
    })
    .collect()
});

static EXCERPTS: LazyLock<Vec<SelectorStrategy>> = LazyLock::new(|| {
    SelectorStrategy::compile(&[
        ".elementor-post__excerpt",
        ".excerpt",
        ".entry-summary",
        ".post-excerpt",
        ".summary",
        "p",
    ])
});

static AUTHORS: LazyLock<Vec<SelectorStrategy>> = LazyLock::new(|| {
    SelectorStrategy::compile(&[
        ".elementor-post-author",
        ".author",
        ".byline",
        "[rel='author']",
        ".post-author",
    ])
});

static DATES: LazyLock<Vec<SelectorStrategy>> = LazyLock::new(|| {
    SelectorStrategy::compile(&[
        "time",
        ".elementor-post-date",
        ".post-date",
        ".entry-date",
        ".published",
        ".date",
    ])
});

pub(crate) static HEADINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4").expect("built-in selector must parse"));

pub(crate) static ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("built-in selector must parse"));

pub(crate) static PARAGRAPHS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("built-in selector must parse"));

pub(crate) static DATE_ELEMENTS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("time, .date, .post-date, .entry-date, .published")
        .expect("built-in selector must parse")
});

/// Title and absolute link of the post a container describes.
pub fn title_and_link(container: &ElementRef<'_>, base: &Url) -> Result<(String, Url), NotFound> {
    first_success(&TITLE_LINK_PAIRS, |pair| pair_match(container, pair, base))
        .or_else(|_| blog_link_with_heading(container, base))
}

fn pair_match(
    container: &ElementRef<'_>,
    pair: &TitleLinkPair,
    base: &Url,
) -> Result<(String, Url), NotFound> {
    let (title_element, title) = container
        .select(&pair.title)
        .map(|el| (el, inline_text(&el)))
        .find(|(_, text)| !text.is_empty())
        .ok_or(NotFound)?;

    // a link inside the title wins over one elsewhere in the card
    let link = href_in(&title_element, &pair.link, base)
        .or_else(|| href_in(container, &pair.link, base))
        .ok_or(NotFound)?;

    tracing::trace!(strategy = pair.name, %link, "Matched title and link");
    Ok((title, link))
}

fn blog_link_with_heading(container: &ElementRef<'_>, base: &Url) -> Result<(String, Url), NotFound> {
    let (anchor, link) = container
        .select(&ANCHORS)
        .find_map(|a| {
            let url = absolutize(base, attr(&a, "href")?)?;
            is_blog_post_link(&url).then_some((a, url))
        })
        .ok_or(NotFound)?;

    let title = container
        .select(&HEADINGS)
        .map(|heading| inline_text(&heading))
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| inline_text(&anchor));

    if title.is_empty() {
        return Err(NotFound);
    }
    Ok((title, link))
}

/// First `href` under `scope` (or on `scope` itself) matching `selector`.
fn href_in(scope: &ElementRef<'_>, selector: &Selector, base: &Url) -> Option<Url> {
    let own = selector
        .matches(scope)
        .then(|| attr(scope, "href"))
        .flatten();

    own.into_iter()
        .chain(scope.select(selector).filter_map(|el| attr(&el, "href")))
        .find_map(|href| absolutize(base, href))
}

pub fn excerpt(container: &ElementRef<'_>) -> String {
    first_success(&EXCERPTS, |strategy| {
        container
            .select(&strategy.selector)
            .map(|el| inline_text(&el))
            .find(|text| text.chars().count() > MIN_EXCERPT_CHARS)
            .ok_or(NotFound)
    })
    .unwrap_or_default()
}

pub fn author(container: &ElementRef<'_>) -> Option<String> {
    first_success(&AUTHORS, |strategy| {
        container
            .select(&strategy.selector)
            .map(|el| strip_by_prefix(&inline_text(&el)))
            .find(|name| !name.is_empty() && name.chars().count() < MAX_AUTHOR_CHARS)
            .ok_or(NotFound)
    })
    .ok()
}

pub fn published_at(container: &ElementRef<'_>) -> Option<DateTime<Utc>> {
    first_success(&DATES, |strategy| {
        let element = container.select(&strategy.selector).next().ok_or(NotFound)?;
        date_of(&element).ok_or(NotFound)
    })
    .ok()
}

/// `datetime` attribute first, then the element's text.
pub(crate) fn date_of(element: &ElementRef<'_>) -> Option<DateTime<Utc>> {
    attr(element, "datetime")
        .and_then(parse_date)
        .or_else(|| parse_date(&inline_text(element)))
}

fn strip_by_prefix(name: &str) -> String {
    let trimmed = name.trim();
    match trimmed.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("by ") => trimmed[3..].trim().to_string(),
        _ => trimmed.to_string(),
    }
}
