//! Link-scan fallback for listings that match no known container.

use chrono::{DateTime, Utc};
use scraper::ElementRef;
use url::Url;

use crate::document::{MarkupDocument, attr, inline_text};
use crate::entities::ArticleStub;
use crate::listing::fields::{ANCHORS, DATE_ELEMENTS, HEADINGS, PARAGRAPHS, date_of};
use crate::listing::links::{absolutize, is_blog_post_link, same_page};

const MIN_TITLE_CHARS: usize = 5;
const MIN_EXCERPT_CHARS: usize = 20;
/// How far up from the anchor to look for a heading, paragraph or date.
const NEIGHBOURHOOD_DEPTH: usize = 3;

pub fn scan_links(document: &MarkupDocument, base: &Url, default_author: &str) -> Vec<ArticleStub> {
    document
        .select(&ANCHORS)
        .filter_map(|anchor| {
            let url = absolutize(base, attr(&anchor, "href")?)?;
            if !is_blog_post_link(&url) || same_page(&url, base) {
                return None;
            }

            let neighbourhood = neighbourhood(&anchor, &url, base);
            let title = Some(inline_text(&anchor))
                .filter(|text| text.chars().count() > MIN_TITLE_CHARS)
                .or_else(|| nearest_heading(&neighbourhood))?;
            if title.chars().count() <= MIN_TITLE_CHARS {
                return None;
            }

            Some(ArticleStub {
                title,
                url,
                author: Some(default_author.to_string()),
                published_at: nearest_date(&neighbourhood),
                excerpt: nearest_paragraph(&neighbourhood).unwrap_or_default(),
            })
        })
        .collect()
}

/// Enclosing elements that describe this post alone: the walk stops at
/// the first ancestor that also links to a different post.
fn neighbourhood<'a>(anchor: &ElementRef<'a>, url: &Url, base: &Url) -> Vec<ElementRef<'a>> {
    anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take(NEIGHBOURHOOD_DEPTH)
        .take_while(|scope| !links_elsewhere(scope, url, base))
        .collect()
}

fn links_elsewhere(scope: &ElementRef<'_>, url: &Url, base: &Url) -> bool {
    scope.select(&ANCHORS).any(|a| {
        attr(&a, "href")
            .and_then(|href| absolutize(base, href))
            .is_some_and(|other| &other != url && is_blog_post_link(&other))
    })
}

fn nearest_heading(neighbourhood: &[ElementRef<'_>]) -> Option<String> {
    neighbourhood.iter().find_map(|scope| {
        scope
            .select(&HEADINGS)
            .map(|heading| inline_text(&heading))
            .find(|text| !text.is_empty())
    })
}

fn nearest_paragraph(neighbourhood: &[ElementRef<'_>]) -> Option<String> {
    neighbourhood.iter().find_map(|scope| {
        scope
            .select(&PARAGRAPHS)
            .map(|p| inline_text(&p))
            .find(|text| text.chars().count() > MIN_EXCERPT_CHARS)
    })
}

fn nearest_date(neighbourhood: &[ElementRef<'_>]) -> Option<DateTime<Utc>> {
    neighbourhood
        .iter()
        .find_map(|scope| scope.select(&DATE_ELEMENTS).find_map(|el| date_of(&el)))
}
