use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use url::Url;

/// Character encoding a page body was decoded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Charset {
    Utf8,
    Windows1252,
    ShiftJis,
    Gbk,
    Big5,
    Other(String),
}

impl Charset {
    pub fn from_encoding(encoding: &'static Encoding) -> Self {
        if encoding == encoding_rs::UTF_8 {
            Self::Utf8
        } else if encoding == encoding_rs::WINDOWS_1252 {
            Self::Windows1252
        } else if encoding == encoding_rs::SHIFT_JIS {
            Self::ShiftJis
        } else if encoding == encoding_rs::GBK || encoding == encoding_rs::GB18030 {
            Self::Gbk
        } else if encoding == encoding_rs::BIG5 {
            Self::Big5
        } else {
            Self::Other(encoding.name().to_string())
        }
    }

    pub fn encoding(&self) -> &'static Encoding {
        match self {
            Self::Utf8 => encoding_rs::UTF_8,
            Self::Windows1252 => encoding_rs::WINDOWS_1252,
            Self::ShiftJis => encoding_rs::SHIFT_JIS,
            Self::Gbk => encoding_rs::GBK,
            Self::Big5 => encoding_rs::BIG5,
            Self::Other(label) => Encoding::for_label(label.as_bytes()).unwrap_or(encoding_rs::UTF_8),
        }
    }
}

/// A fetched HTML page, decoded to UTF-8.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub url_final: Url,
    pub body_utf8: String,
    pub charset: Charset,
}

impl PageResponse {
    /// Wrap already-decoded markup, e.g. for fixtures or cached pages.
    pub fn from_html(url: Url, html: impl Into<String>) -> Self {
        Self {
            url_final: url,
            body_utf8: html.into(),
            charset: Charset::Utf8,
        }
    }
}
