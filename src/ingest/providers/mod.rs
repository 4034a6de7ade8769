// src/ingest/providers/mod.rs
pub mod feed;

pub use feed::{parse_feed, RssFeedFetcher};
