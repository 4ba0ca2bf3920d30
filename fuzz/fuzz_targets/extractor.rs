#![no_main]

use libfuzzer_sys::fuzz_target;
use url::Url;

use quarry::document::MarkupDocument;
use quarry::extractor::ContentExtractor;
use quarry::listing::{ListingExtractor, PaginationResolver};

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);
    let base = Url::parse("https://example.com/blogs/").unwrap();

    // None of the extraction stages may panic on arbitrary markup
    let document = MarkupDocument::parse(&html);
    let _ = PaginationResolver::new().resolve(&base, &document);
    let _ = ListingExtractor::default().extract(&document, &base);
    let _ = ContentExtractor::default().extract(&html);
});
