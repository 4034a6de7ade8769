//! Command-line arguments for the `signal-digest` binary.

use clap::Parser;
use std::path::PathBuf;

/// signal-digest - condense news, email and reports into short summaries
///
/// Reads the enabled sources from the configuration file, merges any configured
/// RSS/Atom feeds into the news source, and prints one summary per source.
///
/// Examples:
///   signal-digest
///   signal-digest --config sources.toml --max-sentences 4
///   signal-digest --backend openai
///   signal-digest --text "Long text here." --content-type email
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the source configuration (JSON, or TOML by extension)
    #[arg(short, long, value_name = "FILE", env = "DIGEST_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding news_sample.txt, email_sample.txt and report_sample.txt
    #[arg(long, value_name = "DIR", default_value = "samples", env = "DIGEST_SAMPLES_DIR")]
    pub samples_dir: PathBuf,

    /// Sentence budget for heuristic summaries (email/report use one fewer)
    #[arg(short, long, default_value = "3", value_name = "COUNT")]
    pub max_sentences: usize,

    /// Backend to try first (openai, deepseek, qwen, gemini); "heuristic" means none
    #[arg(short, long, value_name = "NAME", env = "DIGEST_BACKEND")]
    pub backend: Option<String>,

    /// JSON settings file for the OpenAI-compatible backend
    #[arg(long, value_name = "FILE")]
    pub backend_config: Option<PathBuf>,

    /// Skip fetching configured RSS/Atom feeds
    #[arg(long)]
    pub no_feeds: bool,

    /// Summarize this text instead of the aggregated sources
    #[arg(long, value_name = "TEXT")]
    pub text: Option<String>,

    /// Content type for --text (general, news, email, report)
    #[arg(long, default_value = "general", value_name = "TYPE", requires = "text")]
    pub content_type: String,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Backend to request, if any. Blank and "heuristic" mean heuristics only.
    pub fn backend_name(&self) -> Option<String> {
        self.backend
            .as_deref()
            .map(|b| b.trim().to_lowercase())
            .filter(|b| !b.is_empty() && b != "heuristic")
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_sentences == 0 {
            return Err("--max-sentences must be at least 1".to_string());
        }
        if let Some(text) = &self.text {
            if text.trim().is_empty() {
                return Err("--text must not be empty".to_string());
            }
        }
        Ok(())
    }
}
