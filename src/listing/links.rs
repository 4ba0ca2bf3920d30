use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// A path segment naming a blog section followed by a post slug, or a
/// `/YYYY/MM/` permalink.
static BLOG_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/(?:blogs?|posts?|articles?|news)/[^/?#]+|/\d{4}/\d{2}/").unwrap()
});

/// Archive and pagination paths that live under the blog section but are
/// not posts.
static NON_POST_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/(?:page|category|categories|tag|tags|author|feed)(?:/|$)").unwrap()
});

/// Resolve `href` against `base`, keeping only http(s) targets and dropping
/// the fragment.
pub fn absolutize(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

pub fn is_blog_post_link(url: &Url) -> bool {
    let path = url.path();
    BLOG_PATH.is_match(path) && !NON_POST_PATH.is_match(path)
}

/// Whether two URLs address the same page, ignoring fragments and a
/// trailing slash.
pub fn same_page(a: &Url, b: &Url) -> bool {
    fn key(url: &Url) -> (String, Option<&str>) {
        let mut without_fragment = url.clone();
        without_fragment.set_fragment(None);
        without_fragment.set_query(None);
        let base = without_fragment.as_str().trim_end_matches('/').to_string();
        (base, url.query())
    }
    key(a) == key(b)
}
