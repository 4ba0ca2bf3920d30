use std::time::Duration;

use quarry::fetcher::{BROWSER_USER_AGENT, Charset, FetchError, Fetcher, FetcherConfig, HttpFetcher};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header_regex, method, path},
};

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&FetcherConfig::default()).unwrap()
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(html(
            "<html><head><title>Test</title></head><body>Hello World</body></html>",
        ))
        .mount(&mock_server)
        .await;

    let url = format!("{}/test", mock_server.uri());
    let result = fetcher().fetch(&url).await.unwrap();

    assert!(result.body_utf8.contains("Hello World"));
    assert_eq!(result.charset, Charset::Utf8);
    assert_eq!(result.url_final.as_str(), url);
}

#[tokio::test]
async fn test_fetch_sends_browser_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header_regex("user-agent", "^Mozilla/5.0 .*Chrome/"))
        .and(header_regex("accept", "text/html"))
        .respond_with(html("<html><body>Browser only</body></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/ua", mock_server.uri());
    let result = fetcher().fetch(&url).await.unwrap();

    assert!(BROWSER_USER_AGENT.starts_with("Mozilla/5.0"));
    assert!(result.body_utf8.contains("Browser only"));
}

#[tokio::test]
async fn test_fetch_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notfound"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/notfound", mock_server.uri());
    let result = fetcher().fetch(&url).await;

    match result {
        Err(FetchError::Http { status, retriable }) => {
            assert_eq!(status.as_u16(), 404);
            assert!(!retriable);
        }
        other => panic!("Expected HTTP 404 error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_500_retryable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let url = format!("{}/error", mock_server.uri());
    let result = fetcher().fetch(&url).await;

    match result {
        Err(FetchError::Http { status, retriable }) => {
            assert_eq!(status.as_u16(), 500);
            assert!(retriable);
        }
        other => panic!("Expected HTTP 500 error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/redirect"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/final"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(html("<html><body>Final page</body></html>"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/redirect", mock_server.uri());
    let result = fetcher().fetch(&url).await.unwrap();

    assert!(result.body_utf8.contains("Final page"));
    assert!(result.url_final.as_str().ends_with("/final"));
}

#[tokio::test]
async fn test_fetch_gzip_compression() {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let original_content =
        "<html><head><title>Compressed</title></head><body>This content is gzipped!</body></html>";

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(original_content.as_bytes()).unwrap();
    let compressed_data = encoder.finish().unwrap();

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gzipped"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(compressed_data, "text/html; charset=utf-8")
                .insert_header("Content-Encoding", "gzip"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/gzipped", mock_server.uri());
    let result = fetcher().fetch(&url).await.unwrap();

    assert!(result.body_utf8.contains("This content is gzipped!"));
}

#[tokio::test]
async fn test_fetch_windows_1252_page() {
    let mock_server = MockServer::start().await;

    // "café" with é as the single byte 0xE9
    let mut body = b"<html><head><meta charset=\"windows-1252\"></head><body>caf".to_vec();
    body.push(0xE9);
    body.extend_from_slice(b"</body></html>");

    Mock::given(method("GET"))
        .and(path("/latin"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/latin", mock_server.uri());
    let result = fetcher().fetch(&url).await.unwrap();

    assert!(result.body_utf8.contains("café"));
    assert_eq!(result.charset, Charset::Windows1252);
}

#[tokio::test]
async fn test_fetch_unsupported_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0xFF, 0xD8, 0xFF], "image/jpeg"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/image", mock_server.uri());
    let result = fetcher().fetch(&url).await;

    match result {
        Err(FetchError::UnsupportedContentType(content_type)) => {
            assert_eq!(content_type, "image/jpeg");
        }
        other => panic!("Expected UnsupportedContentType error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_body_too_large() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(html(&"x".repeat(4096)))
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        max_body_bytes: 1024,
        ..FetcherConfig::default()
    };
    let url = format!("{}/large", mock_server.uri());
    let result = HttpFetcher::new(&config).unwrap().fetch(&url).await;

    match result {
        Err(FetchError::BodyTooLarge { size, limit }) => {
            assert_eq!(size, 4096);
            assert_eq!(limit, 1024);
        }
        other => panic!("Expected BodyTooLarge error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_request_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<html><body>Too late</body></html>").set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        request_timeout: Duration::from_millis(200),
        ..FetcherConfig::default()
    };
    let url = format!("{}/slow", mock_server.uri());
    let result = HttpFetcher::new(&config).unwrap().fetch(&url).await;

    match result {
        Err(e) => assert!(e.is_timeout(), "expected a timeout, got {e:?}"),
        Ok(_) => panic!("Expected a timeout"),
    }
}

#[tokio::test]
async fn test_fetch_invalid_url() {
    let result = fetcher().fetch("not-a-valid-url").await;

    match result {
        Err(FetchError::InvalidUrl(_)) => {}
        other => panic!("Expected InvalidUrl error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_retry_classification() {
    assert!(!FetchError::InvalidUrl(url::ParseError::EmptyHost).should_retry());
    assert!(!FetchError::BodyTooLarge { size: 1000, limit: 10 }.should_retry());
    assert!(!FetchError::UnsupportedContentType("image/png".to_string()).should_retry());
    assert!(!FetchError::Charset("Invalid encoding".to_string()).should_retry());

    assert!(FetchError::Connect("connection refused".to_string()).should_retry());
    assert!(FetchError::ConnectTimeout.should_retry());
    assert!(FetchError::RequestTimeout.should_retry());

    assert!(
        !FetchError::Http {
            status: reqwest::StatusCode::NOT_FOUND,
            retriable: false
        }
        .should_retry()
    );
    assert!(
        FetchError::Http {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            retriable: true
        }
        .should_retry()
    );
}
