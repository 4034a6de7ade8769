//! signal-digest binary entrypoint.
//! Wires configuration, the aggregator and the summarizer, then prints one
//! summary per source.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Invalid arguments or configuration

mod cli;

use anyhow::{Context, Result};
use cli::Args;
use signal_digest::config::BackendSettings;
use signal_digest::digest::{render_text, run_digest};
use signal_digest::ingest::providers::RssFeedFetcher;
use signal_digest::ingest::resources::DirResources;
use signal_digest::summarize::BackendRegistry;
use signal_digest::{Aggregator, Summarizer};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "signal_digest=debug,info"
    } else {
        "signal_digest=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let args = Args::parse_args();
    if let Err(e) = args.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    init_tracing(args.verbose);
    info!("signal-digest v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("digest failed: {e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = match &args.backend_config {
        Some(path) => BackendSettings::load_from_file(path)
            .with_context(|| format!("loading backend settings from {}", path.display()))?,
        None => BackendSettings::from_env(),
    };
    let summarizer =
        Summarizer::new(BackendRegistry::with_defaults(&settings)).with_max_sentences(args.max_sentences);
    let backend = args.backend_name();

    if let Some(text) = &args.text {
        let summary = summarizer
            .summarize(text, &args.content_type, backend.as_deref())
            .await;
        println!("{summary}");
        return Ok(());
    }

    let resources = DirResources::new(&args.samples_dir);
    let mut aggregator = match &args.config {
        Some(path) => Aggregator::new(path, resources),
        None => Aggregator::from_env(resources),
    };
    if !args.no_feeds {
        match RssFeedFetcher::http() {
            Ok(fetcher) => aggregator = aggregator.with_feed_fetcher(fetcher),
            Err(e) => warn!(error = ?e, "feed fetcher unavailable; skipping feeds"),
        }
    }

    let sections = run_digest(&aggregator, &summarizer, backend.as_deref()).await?;
    print!("{}", render_text(&sections));
    Ok(())
}
