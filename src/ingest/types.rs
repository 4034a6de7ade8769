// src/ingest/types.rs
use anyhow::Result;

/// One entry pulled from a remote feed.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub summary: String,
}

impl FeedEntry {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
        }
    }

    /// `"{title} {summary}"`, trimmed. This deliberately departs from the bare
    /// template: a missing half leaves no stray space, and an entry with neither
    /// renders as `""` (which [`crate::ingest::render_feed_block`] then drops).
    pub fn render(&self) -> String {
        format!("{} {}", self.title, self.summary).trim().to_string()
    }
}

/// One aggregated source: name plus raw text (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub source: String,
    pub text: String,
}

/// Fetches a feed URL and returns its entries in document order.
#[async_trait::async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>>;
    fn name(&self) -> &'static str;
}

/// Supplies the backing text of local sources by resource name.
pub trait ResourceProvider: Send + Sync {
    /// `None` when the resource does not exist.
    fn read(&self, name: &str) -> Option<String>;
}
