//! # Digest run
//! Aggregate every enabled source, then summarize each one with its name as the
//! content-type hint. Sources with no text are reported as skipped.

use tracing::{info, warn};

use crate::error::Result;
use crate::ingest::Aggregator;
use crate::summarize::Summarizer;

/// Outcome for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestSection {
    pub source: String,
    /// `None` when the source had no content and summarization was skipped.
    pub summary: Option<String>,
}

impl DigestSection {
    pub fn is_skipped(&self) -> bool {
        self.summary.is_none()
    }
}

/// Run aggregation + summarization for all sources, in aggregation order.
pub async fn run_digest(
    aggregator: &Aggregator,
    summarizer: &Summarizer,
    backend: Option<&str>,
) -> Result<Vec<DigestSection>> {
    let contents = aggregator.aggregate().await?;
    let mut out = Vec::with_capacity(contents.len());

    for item in contents {
        if item.text.trim().is_empty() {
            warn!(source = %item.source, "source has no content; skipping summary");
            out.push(DigestSection {
                source: item.source,
                summary: None,
            });
            continue;
        }
        let summary = summarizer
            .summarize(&item.text, &item.source.to_lowercase(), backend)
            .await;
        out.push(DigestSection {
            source: item.source,
            summary: Some(summary),
        });
    }

    info!(
        sections = out.len(),
        skipped = out.iter().filter(|s| s.is_skipped()).count(),
        "digest finished"
    );
    Ok(out)
}

/// Plain-text rendering used by the CLI.
pub fn render_text(sections: &[DigestSection]) -> String {
    let mut out = String::new();
    for s in sections {
        match &s.summary {
            Some(summary) => {
                out.push_str(&format!("=== {} SUMMARY ===\n{}\n\n", s.source.to_uppercase(), summary));
            }
            None => {
                out.push_str(&format!(
                    "[warning] Source '{}' has no content to summarise.\n\n",
                    s.source
                ));
            }
        }
    }
    out
}
