// src/ingest/mod.rs
//! Source aggregation: local resources plus optional remote feeds, merged into a
//! uniform `{source: text}` mapping.

pub mod providers;
pub mod resources;
pub mod types;

use std::path::{Path, PathBuf};

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::sources::{
    default_config_path, load_source_config, SourceConfig, BUILTIN_SOURCES, PLACEHOLDER_PROVIDERS,
};
use crate::error::Result;
use crate::ingest::resources::resource_name_for;
use crate::ingest::types::{ContentItem, FeedEntry, FeedFetcher, ResourceProvider};

/// Entries kept from the head of each feed.
pub const MAX_ENTRIES_PER_FEED: usize = 5;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "digest_feed_entries_total",
            "Feed entries merged into the news source."
        );
        describe_counter!("digest_feed_errors_total", "Feed URLs that failed to fetch/parse.");
        describe_counter!(
            "digest_missing_resources_total",
            "Enabled local sources whose backing resource was missing."
        );
        describe_counter!(
            "digest_backend_attempts_total",
            "Summaries for which a backend was requested."
        );
        describe_counter!(
            "digest_backend_misses_total",
            "Backend attempts that fell back to heuristics."
        );
    });
}

/// Decode entities, strip tags, collapse whitespace.
pub fn clean_feed_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    let stripped = re_tags.replace_all(&decoded, " ");

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render the head of each feed and join everything with blank lines.
///
/// Entries are capped per feed first; entries that render empty are then
/// dropped, an intentional deviation from keeping every rendered slot.
pub fn render_feed_block<'a, I>(feeds: I) -> String
where
    I: IntoIterator<Item = &'a [FeedEntry]>,
{
    feeds
        .into_iter()
        .flat_map(|entries| entries.iter().take(MAX_ENTRIES_PER_FEED))
        .map(FeedEntry::render)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Ordered `{source: text}` mapping produced by [`Aggregator::aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceContents {
    items: Vec<ContentItem>,
}

impl SourceContents {
    pub fn get(&self, source: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|it| it.source == source)
            .map(|it| it.text.as_str())
    }

    pub fn contains(&self, source: &str) -> bool {
        self.get(source).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|it| it.source.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items
            .iter()
            .map(|it| (it.source.as_str(), it.text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert or replace, keeping the original position of an existing key.
    fn insert(&mut self, source: &str, text: String) {
        match self.items.iter_mut().find(|it| it.source == source) {
            Some(it) => it.text = text,
            None => self.items.push(ContentItem {
                source: source.to_string(),
                text,
            }),
        }
    }
}

impl IntoIterator for SourceContents {
    type Item = ContentItem;
    type IntoIter = std::vec::IntoIter<ContentItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Collects raw text from every enabled source.
///
/// Configuration is read on first use and cached for the lifetime of the
/// instance; build a new `Aggregator` to pick up a changed file.
pub struct Aggregator {
    config_path: PathBuf,
    config: OnceCell<SourceConfig>,
    resources: Box<dyn ResourceProvider>,
    feeds: Option<Box<dyn FeedFetcher>>,
}

impl Aggregator {
    pub fn new<R: ResourceProvider + 'static>(config_path: impl Into<PathBuf>, resources: R) -> Self {
        Self {
            config_path: config_path.into(),
            config: OnceCell::new(),
            resources: Box::new(resources),
            feeds: None,
        }
    }

    /// Config path from $DIGEST_CONFIG_PATH (or `config.json`).
    pub fn from_env<R: ResourceProvider + 'static>(resources: R) -> Self {
        Self::new(default_config_path(), resources)
    }

    /// Enable the remote feed step.
    pub fn with_feed_fetcher<F: FeedFetcher + 'static>(mut self, fetcher: F) -> Self {
        self.feeds = Some(Box::new(fetcher));
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Cached configuration, loading it on first call.
    pub fn config(&self) -> Result<&SourceConfig> {
        self.config
            .get_or_try_init(|| load_source_config(&self.config_path))
    }

    /// Build the `{source: text}` mapping.
    ///
    /// Only a malformed configuration fails; missing resources become empty text
    /// and failing feed URLs are skipped.
    pub async fn aggregate(&self) -> Result<SourceContents> {
        ensure_metrics_described();
        let config = self.config()?;
        let mut out = SourceContents::default();

        for source in BUILTIN_SOURCES {
            if !config.is_enabled(source, true) {
                debug!(source, "source disabled");
                continue;
            }
            out.insert(source, self.read_local(source));
        }

        let block = self.collect_feeds(config.feed_urls()).await;
        if !block.is_empty() {
            let merged = match out.get("news") {
                Some(local) if !local.is_empty() => format!("{block}\n\n{local}"),
                _ => block,
            };
            out.insert("news", merged);
        }

        for provider in PLACEHOLDER_PROVIDERS {
            if config.is_enabled(provider, false) {
                debug!(provider, "provider recognized but not wired; registering empty source");
                out.insert(provider, String::new());
            }
        }

        info!(sources = out.len(), "aggregation finished");
        Ok(out)
    }

    fn read_local(&self, source: &str) -> String {
        let Some(name) = resource_name_for(source) else {
            return String::new();
        };
        match self.resources.read(name) {
            Some(text) => text,
            None => {
                warn!(source, resource = name, "resource missing; using empty text");
                counter!("digest_missing_resources_total").increment(1);
                String::new()
            }
        }
    }

    /// Fetch every URL in order; one failing URL never stops the rest.
    async fn collect_feeds(&self, urls: &[String]) -> String {
        let Some(fetcher) = self.feeds.as_deref() else {
            if !urls.is_empty() {
                debug!(count = urls.len(), "feeds configured but no fetcher available");
            }
            return String::new();
        };

        let mut fetched: Vec<Vec<FeedEntry>> = Vec::with_capacity(urls.len());
        for url in urls {
            match fetcher.fetch(url).await {
                Ok(entries) => {
                    let kept = entries.len().min(MAX_ENTRIES_PER_FEED);
                    debug!(url = %url, fetched = entries.len(), kept, "feed fetched");
                    counter!("digest_feed_entries_total").increment(kept as u64);
                    fetched.push(entries);
                }
                Err(e) => {
                    warn!(error = ?e, url = %url, fetcher = fetcher.name(), "feed fetch failed; skipping");
                    counter!("digest_feed_errors_total").increment(1);
                }
            }
        }

        render_feed_block(fetched.iter().map(Vec::as_slice))
    }
}
