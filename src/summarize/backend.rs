//! Backend capabilities: a registry from identifier to summarizer, plus the
//! concrete providers (OpenAI-compatible, placeholders, fixed replies).
//!
//! A backend either produces a usable summary (`Ok(Some(_))`), signals a miss
//! (`Ok(None)`), or fails (`Err(_)`). The dispatcher treats the last two alike.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::backend::BackendSettings;

// ------------------------------------------------------------
// Public surface
// ------------------------------------------------------------

pub type BackendFuture<'a> =
    Pin<Box<dyn Future<Output = anyhow::Result<Option<String>>> + Send + 'a>>;

/// One external summarization capability.
pub trait SummaryBackend: Send + Sync {
    /// Summarize the full raw `content`, framed by `content_type`.
    ///
    /// `content_type` is the caller's hint trimmed and lowercased, not collapsed:
    /// a type with no heuristic of its own (say `tweet`) arrives as given.
    fn summarize<'a>(&'a self, content: &'a str, content_type: &'a str) -> BackendFuture<'a>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

pub type DynBackend = Arc<dyn SummaryBackend>;

/// Identifiers reserved for providers that are not wired up yet.
pub const PLACEHOLDER_BACKENDS: [&str; 3] = ["deepseek", "qwen", "gemini"];

/// Set to `mock` to register a deterministic `mock` backend (local runs/tests).
pub const ENV_BACKEND_TEST_MODE: &str = "DIGEST_BACKEND_TEST_MODE";

/// Explicit identifier → backend mapping, populated at startup.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: BTreeMap<String, DynBackend>,
}

impl BackendRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `openai` plus the placeholder identifiers. The OpenAI backend is left
    /// unregistered (and therefore always misses) if its HTTP client cannot be built.
    pub fn with_defaults(settings: &BackendSettings) -> Self {
        let mut reg = Self::empty();
        match OpenAiBackend::new(settings) {
            Ok(b) => reg.register("openai", b),
            Err(e) => warn!(error = ?e, "openai backend unavailable"),
        }
        for name in PLACEHOLDER_BACKENDS {
            reg.register(name, PlaceholderBackend::new(name));
        }
        if std::env::var(ENV_BACKEND_TEST_MODE)
            .map(|v| v == "mock")
            .unwrap_or(false)
        {
            reg.register("mock", FixedBackend::new("Summary unavailable offline (mock)."));
        }
        reg
    }

    /// Register (or replace) a backend; the identifier is trimmed and lowercased.
    pub fn register<B: SummaryBackend + 'static>(&mut self, name: &str, backend: B) {
        self.backends
            .insert(normalize_backend_name(name), Arc::new(backend));
    }

    pub fn get(&self, name: &str) -> Option<&DynBackend> {
        self.backends.get(&normalize_backend_name(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }
}

pub(crate) fn normalize_backend_name(name: &str) -> String {
    name.trim().to_lowercase()
}

// ------------------------------------------------------------
// Concrete backends
// ------------------------------------------------------------

/// OpenAI-compatible Chat Completions backend.
pub struct OpenAiBackend {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiBackend {
    pub fn new(settings: &BackendSettings) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("signal-digest/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(settings.timeout_secs.min(10)))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("building openai http client")?;
        Ok(Self {
            http,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            endpoint: format!(
                "{}/chat/completions",
                settings.base_url.trim_end_matches('/')
            ),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }
}

pub fn build_prompt(content: &str, content_type: &str) -> String {
    format!(
        "You are an assistant that summarises {content_type} content. Provide a concise summary \
         capturing the key points, actions and conclusions where relevant.\n\n{content}"
    )
}

impl SummaryBackend for OpenAiBackend {
    fn summarize<'a>(&'a self, content: &'a str, content_type: &'a str) -> BackendFuture<'a> {
        Box::pin(async move {
            if self.api_key.is_empty() {
                return Ok(None);
            }

            #[derive(Serialize)]
            struct Msg<'a> {
                role: &'a str,
                content: &'a str,
            }
            #[derive(Serialize)]
            struct Req<'a> {
                model: &'a str,
                messages: Vec<Msg<'a>>,
                temperature: f32,
                max_tokens: u32,
            }
            #[derive(Deserialize)]
            struct Resp {
                choices: Vec<Choice>,
            }
            #[derive(Deserialize)]
            struct Choice {
                message: ChoiceMsg,
            }
            #[derive(Deserialize)]
            struct ChoiceMsg {
                content: Option<String>,
            }

            let prompt = build_prompt(content, content_type);
            let req = Req {
                model: &self.model,
                messages: vec![Msg {
                    role: "user",
                    content: &prompt,
                }],
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            };

            let resp = self
                .http
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&req)
                .send()
                .await
                .context("openai request")?
                .error_for_status()
                .context("openai status")?;

            let body: Resp = resp.json().await.context("openai response body")?;
            let text = body
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
            Ok(text)
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Recognized but unimplemented provider; always misses.
pub struct PlaceholderBackend {
    name: &'static str,
}

impl PlaceholderBackend {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl SummaryBackend for PlaceholderBackend {
    fn summarize<'a>(&'a self, _content: &'a str, _ct: &'a str) -> BackendFuture<'a> {
        Box::pin(async { Ok(None) })
    }
    fn provider_name(&self) -> &'static str {
        self.name
    }
}

/// Returns the same reply for every request.
#[derive(Clone)]
pub struct FixedBackend {
    pub reply: String,
}

impl FixedBackend {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl SummaryBackend for FixedBackend {
    fn summarize<'a>(&'a self, _content: &'a str, _ct: &'a str) -> BackendFuture<'a> {
        let out = self.reply.clone();
        Box::pin(async move { Ok(Some(out)) })
    }
    fn provider_name(&self) -> &'static str {
        "fixed"
    }
}
