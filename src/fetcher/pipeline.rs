use crate::fetcher::{
    errors::FetchError,
    types::{Charset, PageResponse},
};
use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// How far into the body to look for a `<meta>` charset declaration.
const SNIFF_WINDOW: usize = 4096;

static HEADER_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

/// `<meta charset=..>` and `<meta http-equiv="Content-Type" content="..; charset=..">`.
static META_CHARSETS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>;]+)"#).unwrap(),
        Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap(),
    ]
});

pub fn process_response(
    url_final: Url,
    body_bytes: &[u8],
    content_type: &str,
) -> Result<PageResponse, FetchError> {
    let charset = detect_charset(content_type, body_bytes);
    let body_utf8 = decode(body_bytes, &charset)?;

    Ok(PageResponse {
        url_final,
        body_utf8,
        charset,
    })
}

/// Header declaration first, then `<meta>` tags, then byte-level guessing.
fn detect_charset(content_type: &str, body: &[u8]) -> Charset {
    let head = String::from_utf8_lossy(&body[..body.len().min(SNIFF_WINDOW)]);

    let declared = label_encoding(&HEADER_CHARSET, content_type).or_else(|| {
        META_CHARSETS
            .iter()
            .find_map(|pattern| label_encoding(pattern, &head))
    });

    let encoding = declared.unwrap_or_else(|| {
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(&body[..body.len().min(SNIFF_WINDOW)], body.len() <= SNIFF_WINDOW);
        detector.guess(None, true)
    });

    Charset::from_encoding(encoding)
}

fn label_encoding(pattern: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = pattern.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}

/// Decode `body`, replacing malformed sequences. Only a body that is mostly
/// replacement characters is treated as a charset failure.
fn decode(body: &[u8], charset: &Charset) -> Result<String, FetchError> {
    let encoding = charset.encoding();
    let (decoded, _, had_errors) = encoding.decode(body);

    if had_errors {
        let replaced = decoded.chars().filter(|c| *c == '\u{FFFD}').count();
        if replaced * 2 > decoded.chars().count() {
            return Err(FetchError::Charset(format!(
                "body is not valid {}",
                encoding.name()
            )));
        }
    }

    Ok(decoded.into_owned())
}
