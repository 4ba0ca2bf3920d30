use std::sync::Arc;

use quarry::entities::RunStatus;
use quarry::fetcher::{FetcherConfig, HttpFetcher};
use quarry::scrape::{MemoryRunLog, ScrapeError, ScrapeOrchestrator};
use quarry::selection::SelectionPolicy;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header_regex, method, path},
};

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html; charset=utf-8")
}

fn elementor_card(slug: &str, date: Option<&str>) -> String {
    let date = date
        .map(|d| format!(r#"<span class="elementor-post-date">{d}</span>"#))
        .unwrap_or_default();
    format!(
        r#"<article class="elementor-post">
             <div class="elementor-post__text">
               <h3 class="elementor-post__title"><a href="/blog/{slug}/">Post {slug}</a></h3>
               <div class="elementor-post__meta-data">
                 <span class="elementor-post-author">By Sam Lee</span>
                 {date}
               </div>
               <div class="elementor-post__excerpt"><p>Excerpt for {slug}, shown on the listing.</p></div>
               <a class="elementor-post__read-more" href="/blog/{slug}/">Read More »</a>
             </div>
           </article>"#
    )
}

fn listing_page(cards: &[String], pagination: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>Blog</title></head><body>
             <header><nav><a href="/">Home</a><a href="/blog/">Blog</a></nav></header>
             <div class="elementor-posts-container">{}</div>
             {pagination}
             <footer>© Example</footer>
           </body></html>"#,
        cards.concat()
    )
}

fn body_text(slug: &str) -> String {
    format!(
        "This is the full body of {slug}. It runs well past the container threshold, \
         so the extractor keeps it verbatim as the article content."
    )
}

fn article_page(slug: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><body>
             <nav><a href="/">Home</a></nav>
             <article><h1>Post {slug}</h1><div class="post-content"><p>{}</p></div></article>
             <aside class="sidebar">Subscribe</aside>
           </body></html>"#,
        body_text(slug)
    )
}

async fn mount_articles(server: &MockServer, slugs: &[&str]) {
    for slug in slugs {
        Mock::given(method("GET"))
            .and(path(format!("/blog/{slug}/")))
            .respond_with(html(article_page(slug)))
            .mount(server)
            .await;
    }
}

fn orchestrator(run_log: Arc<MemoryRunLog>) -> ScrapeOrchestrator {
    let fetcher = HttpFetcher::new(&FetcherConfig::default()).unwrap();
    ScrapeOrchestrator::new(Arc::new(fetcher), run_log)
}

#[tokio::test]
async fn test_end_to_end_oldest_five() {
    let server = MockServer::start().await;

    let cards = vec![
        elementor_card("p1", Some("May 10, 2023")),
        elementor_card("p2", None),
        elementor_card("p3", Some("January 15, 2023")),
        elementor_card("p4", Some("March 2, 2023")),
        elementor_card("p5", None),
        elementor_card("p6", Some("December 1, 2022")),
        elementor_card("p7", None),
        elementor_card("p8", Some("July 20, 2023")),
    ];
    Mock::given(method("GET"))
        .and(path("/blog/"))
        .and(header_regex("user-agent", "Mozilla/5.0"))
        .respond_with(html(listing_page(&cards, "")))
        .expect(1)
        .mount(&server)
        .await;
    mount_articles(&server, &["p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8"]).await;

    let run_log = Arc::new(MemoryRunLog::new());
    let listing_url = format!("{}/blog/", server.uri());
    let articles = orchestrator(run_log.clone()).run(&listing_url).await.unwrap();

    let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Post p6", "Post p3", "Post p4", "Post p1", "Post p8"]);

    for article in &articles {
        let slug = article.title.trim_start_matches("Post ");
        assert_eq!(article.content, body_text(slug));
        assert_eq!(article.author.as_deref(), Some("Sam Lee"));
        assert_eq!(article.url.as_str(), format!("{}/blog/{slug}/", server.uri()));
        assert!(article.published_at.is_some());
    }
    assert_eq!(
        articles[0].published_at.unwrap().date_naive().to_string(),
        "2022-12-01"
    );

    let outcomes = run_log.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status, RunStatus::Success);
    assert_eq!(outcomes[0].articles_found, 5);
}

#[tokio::test]
async fn test_last_page_with_backfill_from_first_page() {
    let server = MockServer::start().await;

    let pagination = r#"<nav class="elementor-pagination">
        <span class="page-numbers current">1</span>
        <a class="page-numbers" href="/blog/page/2/">2</a>
        <a class="page-numbers" href="/blog/page/3/">3</a>
        <a class="page-numbers next" href="/blog/page/2/">Next »</a>
    </nav>"#;
    let first_page = listing_page(
        &[
            elementor_card("n1", None),
            elementor_card("n2", None),
            elementor_card("n3", None),
        ],
        pagination,
    );
    let last_page = listing_page(
        &[
            elementor_card("o1", Some("March 1, 2021")),
            elementor_card("o2", Some("January 1, 2021")),
            elementor_card("o3", Some("February 1, 2021")),
        ],
        "",
    );

    Mock::given(method("GET"))
        .and(path("/blog/"))
        .respond_with(html(first_page))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blog/page/3/"))
        .respond_with(html(last_page))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blog/page/2/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    mount_articles(&server, &["o1", "o2", "o3", "n1", "n2", "n3"]).await;

    let run_log = Arc::new(MemoryRunLog::new());
    let listing_url = format!("{}/blog/", server.uri());
    let articles = orchestrator(run_log.clone()).run(&listing_url).await.unwrap();

    let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Post o2", "Post o3", "Post o1", "Post n1", "Post n2"]);
    assert_eq!(articles[3].published_at, None);
}

#[tokio::test]
async fn test_missing_article_page_falls_back_to_excerpt() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blog/"))
        .respond_with(html(listing_page(&[elementor_card("lost", Some("June 1, 2023"))], "")))
        .mount(&server)
        .await;

    let listing_url = format!("{}/blog/", server.uri());
    let articles = orchestrator(Arc::new(MemoryRunLog::new()))
        .with_selection(SelectionPolicy::new(3))
        .run(&listing_url)
        .await
        .unwrap();

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].content, "Excerpt for lost, shown on the listing.");
}

#[tokio::test]
async fn test_listing_fetch_failure_is_fatal_and_logged() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blog/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let run_log = Arc::new(MemoryRunLog::new());
    let listing_url = format!("{}/blog/", server.uri());
    let result = orchestrator(run_log.clone()).run(&listing_url).await;

    match result {
        Err(ScrapeError::ListingFetch { url, source }) => {
            assert_eq!(url, listing_url);
            assert!(source.should_retry());
        }
        other => panic!("Expected ListingFetch error, got {other:?}"),
    }

    let outcomes = run_log.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status, RunStatus::Error);
    assert!(outcomes[0].error_message.as_deref().unwrap().contains("503"));
    assert_eq!(outcomes[0].listing_attempts, 2);
}
