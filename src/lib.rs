pub mod cascade;
pub mod config;
pub mod document;
pub mod entities;
pub mod extractor;
pub mod fetcher;
pub mod listing;
pub mod scrape;
pub mod selection;
