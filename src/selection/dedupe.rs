use std::collections::HashSet;

use crate::entities::ArticleStub;

/// Drop repeated URLs, keeping the first occurrence and the original order.
pub fn dedupe(stubs: Vec<ArticleStub>) -> Vec<ArticleStub> {
    let mut seen = HashSet::new();
    stubs
        .into_iter()
        .filter(|stub| seen.insert(stub.url.clone()))
        .collect()
}

/// `primary` followed by whatever `extra` adds, deduplicated by URL.
pub fn merge(primary: Vec<ArticleStub>, extra: Vec<ArticleStub>) -> Vec<ArticleStub> {
    dedupe(primary.into_iter().chain(extra).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn stub(title: &str, path: &str) -> ArticleStub {
        ArticleStub {
            title: title.to_string(),
            url: Url::parse("https://example.com").unwrap().join(path).unwrap(),
            author: None,
            published_at: None,
            excerpt: String::new(),
        }
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let stubs = dedupe(vec![
            stub("Title link", "/blogs/a/"),
            stub("Second", "/blogs/b/"),
            stub("Read more", "/blogs/a/"),
        ]);
        let titles: Vec<_> = stubs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Title link", "Second"]);
    }

    #[test]
    fn test_merge_prefers_primary() {
        let merged = merge(
            vec![stub("From last page", "/blogs/a/")],
            vec![stub("From first page", "/blogs/a/"), stub("Only on first", "/blogs/c/")],
        );
        let titles: Vec<_> = merged.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["From last page", "Only on first"]);
    }
}
