// src/ingest/providers/feed.rs
//! RSS 2.0 / Atom feed fetcher. Entries come back cleaned (entities decoded,
//! tags stripped, whitespace collapsed) and in document order.

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::clean_feed_text;
use crate::ingest::types::{FeedEntry, FeedFetcher};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}
#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    summary: Option<AtomText>,
    content: Option<AtomText>,
}
/// Atom text constructs carry a `type` attribute; only the text matters here.
#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}

pub struct RssFeedFetcher {
    mode: Mode,
}

enum Mode {
    /// URL → XML body, served without touching the network.
    Fixtures(HashMap<String, String>),
    Http { client: reqwest::Client },
}

impl RssFeedFetcher {
    pub fn http() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("signal-digest/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building feed http client")?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            mode: Mode::Http { client },
        }
    }

    /// Serve `(url, xml)` pairs; any other URL fails like an unreachable host.
    pub fn from_fixtures<I, U, X>(fixtures: I) -> Self
    where
        I: IntoIterator<Item = (U, X)>,
        U: Into<String>,
        X: Into<String>,
    {
        let map = fixtures
            .into_iter()
            .map(|(u, x)| (u.into(), x.into()))
            .collect();
        Self {
            mode: Mode::Fixtures(map),
        }
    }
}

#[async_trait]
impl FeedFetcher for RssFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>> {
        match &self.mode {
            Mode::Fixtures(map) => {
                let body = map
                    .get(url)
                    .ok_or_else(|| anyhow!("no fixture registered for {url}"))?;
                parse_feed(body)
            }
            Mode::Http { client } => {
                let body = client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("feed http get({url})"))?
                    .error_for_status()
                    .with_context(|| format!("feed http status ({url})"))?
                    .text()
                    .await
                    .context("feed http .text()")?;
                parse_feed(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        match self.mode {
            Mode::Fixtures(_) => "rss-fixtures",
            Mode::Http { .. } => "rss-http",
        }
    }
}

/// Parse an RSS 2.0 or Atom document into entries.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    let xml_clean = scrub_html_entities_for_xml(xml);

    let rss_err = match from_str::<Rss>(&xml_clean) {
        Ok(rss) => {
            return Ok(rss
                .channel
                .item
                .into_iter()
                .map(|it| {
                    FeedEntry::new(
                        clean_feed_text(it.title.as_deref().unwrap_or_default()),
                        clean_feed_text(it.description.as_deref().unwrap_or_default()),
                    )
                })
                .collect())
        }
        Err(e) => e,
    };
    if !xml_clean.contains("<feed") {
        return Err(rss_err).context("parsing rss xml");
    }

    let atom: AtomFeed = from_str(&xml_clean)
        .map_err(|_| rss_err)
        .context("parsing atom xml")?;
    Ok(atom
        .entry
        .into_iter()
        .map(|e| {
            let body = e.summary.or(e.content).map(|t| t.value).unwrap_or_default();
            FeedEntry::new(
                clean_feed_text(&e.title.map(|t| t.value).unwrap_or_default()),
                clean_feed_text(&body),
            )
        })
        .collect())
}

/// Named HTML entities are not valid XML; map the common ones before parsing.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>T</title>
  <item><title>First &amp; best</title><description><![CDATA[<p>Body&nbsp;one.</p>]]></description></item>
  <item><title>Second</title></item>
</channel></rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom"><title>A</title>
  <entry><title type="text">Alpha</title><summary type="html">Sum &lt;b&gt;one&lt;/b&gt;</summary></entry>
  <entry><title>Beta</title><content type="text">Content two</content></entry>
</feed>"#;

    #[test]
    fn parses_rss_items_in_order() {
        let v = parse_feed(RSS).unwrap();
        assert_eq!(
            v,
            vec![
                FeedEntry::new("First & best", "Body one."),
                FeedEntry::new("Second", ""),
            ]
        );
    }

    #[test]
    fn parses_atom_entries_with_summary_or_content() {
        let v = parse_feed(ATOM).unwrap();
        assert_eq!(
            v,
            vec![
                FeedEntry::new("Alpha", "Sum one"),
                FeedEntry::new("Beta", "Content two"),
            ]
        );
    }

    #[test]
    fn documents_that_are_not_feeds_are_errors() {
        assert!(parse_feed("<html><body>nope</body></html>").is_err());
    }

    #[tokio::test]
    async fn fixture_mode_serves_known_urls_only() {
        let f = RssFeedFetcher::from_fixtures([("https://feeds.test/a", RSS)]);
        assert_eq!(f.fetch("https://feeds.test/a").await.unwrap().len(), 2);
        assert!(f.fetch("https://feeds.test/missing").await.is_err());
    }
}
