// tests/dispatch.rs
use signal_digest::config::BackendSettings;
use signal_digest::summarize::backend::{BackendFuture, FixedBackend, PlaceholderBackend};
use signal_digest::summarize::{BackendRegistry, SummaryBackend};
use signal_digest::Summarizer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const EMAIL: &str = "Meeting at 3pm.\nTODO: send report by Friday.\nSee you there.";
const REPORT: &str = "Intro sentence.\n\nBody one. Body two. Body three.\n\nEnd.";
const NEWS: &str = "One. Two. Three. Four. Five.";

/// Fails every call and counts how often it was asked.
struct AlwaysFails {
    calls: Arc<AtomicUsize>,
}

impl SummaryBackend for AlwaysFails {
    fn summarize<'a>(&'a self, _content: &'a str, _ct: &'a str) -> BackendFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Err(anyhow::anyhow!("provider unavailable")) })
    }
    fn provider_name(&self) -> &'static str {
        "always-fails"
    }
}

/// Echoes the content type it received.
struct EchoType;

impl SummaryBackend for EchoType {
    fn summarize<'a>(&'a self, _content: &'a str, ct: &'a str) -> BackendFuture<'a> {
        Box::pin(async move { Ok(Some(format!("type={ct}"))) })
    }
    fn provider_name(&self) -> &'static str {
        "echo"
    }
}

#[tokio::test]
async fn failing_backend_never_escapes_and_matches_heuristics() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut reg = BackendRegistry::empty();
    reg.register("flaky", AlwaysFails { calls: calls.clone() });
    let with_backend = Summarizer::new(reg);
    let plain = Summarizer::default();

    for (content, ctype) in [(EMAIL, "email"), (REPORT, "report"), (NEWS, "news"), (NEWS, "memo")] {
        let got = with_backend.summarize(content, ctype, Some("flaky")).await;
        let expected = plain.summarize(content, ctype, None).await;
        assert_eq!(got, expected, "content type {ctype}");
    }
    // Single attempt per request, no retries.
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn unified_defaults_per_content_type() {
    let s = Summarizer::default();
    assert_eq!(s.summarize(NEWS, "news", None).await, "One. Two. Three.");
    assert_eq!(s.summarize(NEWS, "general", None).await, "One. Two. Three.");
    assert_eq!(s.summarize(NEWS, "  Unknown-Type ", None).await, "One. Two. Three.");
    assert_eq!(
        s.summarize(EMAIL, "EMAIL", None).await,
        "Meeting at 3pm. TODO: send report by Friday.\n\nAction items:\n- TODO: send report by Friday."
    );
    assert_eq!(
        s.summarize(REPORT, "report", None).await,
        "Section 1: Intro sentence.\n\nSection 2: Body one. Body two.\n\nSection 3: End."
    );
}

#[tokio::test]
async fn backend_receives_normalized_content_type() {
    let mut reg = BackendRegistry::empty();
    reg.register("echo", EchoType);
    let s = Summarizer::new(reg);
    assert_eq!(s.summarize(NEWS, " REPORT ", Some("echo")).await, "type=report");
    assert_eq!(s.summarize(NEWS, " Tweet ", Some("ECHO")).await, "type=tweet");
    assert_eq!(s.summarize(NEWS, "  ", Some("echo")).await, "type=general");
}

#[tokio::test]
async fn placeholders_and_unknown_backends_fall_back() {
    let s = Summarizer::new(BackendRegistry::with_defaults(&BackendSettings::default()));
    let expected = Summarizer::default().summarize(NEWS, "news", None).await;
    for name in ["deepseek", "qwen", "gemini", "openai", "no-such-backend"] {
        assert_eq!(s.summarize(NEWS, "news", Some(name)).await, expected, "{name}");
    }
}

#[tokio::test]
async fn registered_backend_output_is_returned_as_is() {
    let mut reg = BackendRegistry::empty();
    reg.register("fixed", FixedBackend::new("A crisp summary."));
    reg.register("todo", PlaceholderBackend::new("todo"));
    let s = Summarizer::new(reg).with_max_sentences(5);

    assert_eq!(s.summarize(EMAIL, "email", Some("fixed")).await, "A crisp summary.");
    assert_eq!(
        s.summarize(NEWS, "news", Some("todo")).await,
        "One. Two. Three. Four. Five."
    );
}
