// tests/digest_e2e.rs
use signal_digest::digest::render_text;
use signal_digest::ingest::providers::RssFeedFetcher;
use signal_digest::ingest::resources::DirResources;
use signal_digest::summarize::backend::FixedBackend;
use signal_digest::summarize::BackendRegistry;
use signal_digest::{run_digest, Aggregator, DigestSection, Summarizer};
use std::fs;

const TECH_XML: &str = include_str!("fixtures/tech_atom.xml");

fn sample_dir() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join("news_sample.txt"),
        "Markets opened higher. Tech led gains. Oil was flat. Bonds rallied late.",
    )
    .unwrap();
    fs::write(
        tmp.path().join("email_sample.txt"),
        "Hi team.\nThe launch slipped a week.\nAction: update the roadmap.\nThanks.",
    )
    .unwrap();
    tmp
}

#[tokio::test]
async fn digest_summarizes_each_source_and_skips_empty_ones() {
    let tmp = sample_dir();
    let cfg = tmp.path().join("config.json");
    fs::write(&cfg, r#"{"report": true, "gmail": true}"#).unwrap();

    let agg = Aggregator::new(&cfg, DirResources::new(tmp.path()));
    let sections = run_digest(&agg, &Summarizer::default(), None).await.unwrap();

    let names: Vec<&str> = sections.iter().map(|s| s.source.as_str()).collect();
    assert_eq!(names, vec!["news", "email", "report", "gmail"]);

    assert_eq!(
        sections[0].summary.as_deref(),
        Some("Markets opened higher. Tech led gains. Oil was flat.")
    );
    assert_eq!(
        sections[1].summary.as_deref(),
        Some("Hi team. The launch slipped a week.\n\nAction items:\n- Action: update the roadmap.")
    );
    assert!(sections[2].is_skipped(), "report sample is missing");
    assert!(sections[3].is_skipped(), "placeholder providers carry no text");

    let text = render_text(&sections);
    assert!(text.starts_with("=== NEWS SUMMARY ===\n"));
    assert!(text.contains("[warning] Source 'report' has no content to summarise."));
}

#[tokio::test]
async fn digest_uses_backend_when_it_answers() {
    let tmp = sample_dir();
    let cfg = tmp.path().join("config.json");
    fs::write(&cfg, r#"{"email": false, "report": false}"#).unwrap();

    let mut reg = BackendRegistry::empty();
    reg.register("fixed", FixedBackend::new("Backend digest."));
    let agg = Aggregator::new(&cfg, DirResources::new(tmp.path()));
    let sections = run_digest(&agg, &Summarizer::new(reg), Some("fixed")).await.unwrap();

    assert_eq!(
        sections,
        vec![DigestSection {
            source: "news".into(),
            summary: Some("Backend digest.".into()),
        }]
    );
}

#[tokio::test]
async fn digest_with_feeds_summarizes_merged_news() {
    let tmp = sample_dir();
    let cfg = tmp.path().join("config.json");
    fs::write(
        &cfg,
        r#"{"email": false, "report": false, "rss_feeds": ["https://tech.example.test/atom"]}"#,
    )
    .unwrap();

    let agg = Aggregator::new(&cfg, DirResources::new(tmp.path()))
        .with_feed_fetcher(RssFeedFetcher::from_fixtures([(
            "https://tech.example.test/atom",
            TECH_XML,
        )]));
    let sections = run_digest(&agg, &Summarizer::default(), None).await.unwrap();

    assert_eq!(
        sections[0].summary.as_deref(),
        Some("Compiler release New version ships faster builds. Database patch Fixes a replication bug. Markets opened higher.")
    );
}

#[tokio::test]
async fn digest_propagates_configuration_errors() {
    let tmp = sample_dir();
    let cfg = tmp.path().join("config.json");
    fs::write(&cfg, r#"{"rss_feeds": 42}"#).unwrap();

    let agg = Aggregator::new(&cfg, DirResources::new(tmp.path()));
    assert!(run_digest(&agg, &Summarizer::default(), None).await.is_err());
}
