//! Publish-date parsing for listing metadata.
//!
//! Blogs print dates in whatever format their theme likes. Anything that
//! does not parse is simply absent; callers never see an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Labels themes put in front of the date itself.
const LEADING_LABELS: &[&str] = &["published", "posted", "updated", "on"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d %B, %Y",
    "%m/%d/%Y",
    "%d.%m.%Y",
];

static ORDINAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap());

static EMBEDDED_ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").unwrap());

pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let text = clean(raw);
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&text) {
        return Some(parsed.with_timezone(&Utc));
    }

    let datetime = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&text, format).ok());
    if let Some(datetime) = datetime {
        return Some(datetime.and_utc());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&text, format).ok())
        .or_else(|| {
            let embedded = EMBEDDED_ISO_DATE.captures(&text)?.get(1)?;
            NaiveDate::parse_from_str(embedded.as_str(), "%Y-%m-%d").ok()
        })
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

fn clean(raw: &str) -> String {
    let mut text = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    loop {
        let lower = text.to_lowercase();
        let stripped = LEADING_LABELS.iter().find_map(|label| {
            let rest = lower.strip_prefix(label)?;
            let next = rest.chars().next()?;
            (next.is_whitespace() || next == ':').then(|| label.len())
        });
        match stripped.and_then(|len| text.get(len..)) {
            Some(rest) => {
                text = rest
                    .trim_start_matches(|c: char| c == ':' || c.is_whitespace())
                    .to_string()
            }
            None => break,
        }
    }

    let text = ORDINAL_SUFFIX.replace_all(&text, "$1");
    text.trim_end_matches(['.', ',', '|', '-', ' ']).to_string()
}
