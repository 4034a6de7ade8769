// src/summarize/mod.rs
//! Summarization entry: optional backend attempt, then the heuristic strategy
//! matching the content type.

pub mod backend;
pub mod heuristics;
pub mod sentences;

use metrics::counter;
use tracing::{debug, warn};

use crate::summarize::backend::normalize_backend_name;

pub use crate::summarize::backend::{BackendRegistry, SummaryBackend};
pub use crate::summarize::heuristics::{summarize_email, summarize_general, summarize_report};
pub use crate::summarize::sentences::split_sentences;

/// Sentence budget used when the caller does not pick one.
pub const DEFAULT_MAX_SENTENCES: usize = 3;

/// Content-type hint. Anything unrecognized is treated as `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    General,
    News,
    Email,
    Report,
}

impl ContentType {
    /// Trim, lowercase, and map unknown values to `General`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "news" => ContentType::News,
            "email" => ContentType::Email,
            "report" => ContentType::Report,
            _ => ContentType::General,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::General => "general",
            ContentType::News => "news",
            ContentType::Email => "email",
            ContentType::Report => "report",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified summarizer: backend first when asked, heuristics always as fallback.
#[derive(Clone)]
pub struct Summarizer {
    registry: BackendRegistry,
    max_sentences: usize,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new(BackendRegistry::empty())
    }
}

impl Summarizer {
    pub fn new(registry: BackendRegistry) -> Self {
        Self {
            registry,
            max_sentences: DEFAULT_MAX_SENTENCES,
        }
    }

    /// Override the sentence budget (clamped to at least 1).
    pub fn with_max_sentences(mut self, max_sentences: usize) -> Self {
        self.max_sentences = max_sentences.max(1);
        self
    }

    pub fn max_sentences(&self) -> usize {
        self.max_sentences
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Summarize `content`. Never fails: backend errors and misses fall through
    /// to the heuristic for `content_type`. An empty/blank `backend` means none.
    ///
    /// Backends see the trimmed, lowercased hint; only heuristic selection maps
    /// unknown hints to `General`.
    pub async fn summarize(&self, content: &str, content_type: &str, backend: Option<&str>) -> String {
        let hint = content_type.trim().to_lowercase();
        let hint = if hint.is_empty() { "general".to_string() } else { hint };

        if let Some(name) = backend.map(normalize_backend_name) {
            if !name.is_empty() {
                if let Some(summary) = self.attempt_backend(&name, content, &hint).await {
                    return summary;
                }
            }
        }

        self.heuristic(content, ContentType::parse(&hint))
    }

    /// The deterministic strategy for `ctype` at this summarizer's budget.
    pub fn heuristic(&self, content: &str, ctype: ContentType) -> String {
        let reduced = self.max_sentences.saturating_sub(1).max(1);
        match ctype {
            ContentType::Email => summarize_email(content, reduced),
            ContentType::Report => summarize_report(content, reduced),
            ContentType::News | ContentType::General => summarize_general(content, self.max_sentences),
        }
    }

    async fn attempt_backend(&self, name: &str, content: &str, content_type: &str) -> Option<String> {
        counter!("digest_backend_attempts_total").increment(1);

        let Some(backend) = self.registry.get(name) else {
            debug!(backend = name, "backend not registered; using heuristics");
            counter!("digest_backend_misses_total").increment(1);
            return None;
        };

        match backend.summarize(content, content_type).await {
            Ok(Some(s)) if !s.trim().is_empty() => {
                debug!(backend = name, provider = backend.provider_name(), "backend summary used");
                Some(s)
            }
            Ok(_) => {
                debug!(backend = name, "backend returned no summary; using heuristics");
                counter!("digest_backend_misses_total").increment(1);
                None
            }
            Err(e) => {
                warn!(error = ?e, backend = name, "backend failed; using heuristics");
                counter!("digest_backend_misses_total").increment(1);
                None
            }
        }
    }
}
