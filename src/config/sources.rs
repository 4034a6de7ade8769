// src/config/sources.rs
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{DigestError, Result};

pub const ENV_CONFIG_PATH: &str = "DIGEST_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Local sources read from the resource provider, in output order.
pub const BUILTIN_SOURCES: [&str; 3] = ["news", "email", "report"];
/// Key holding the ordered feed URL list.
pub const FEEDS_KEY: &str = "rss_feeds";
/// Recognized providers that are not wired to any data yet.
pub const PLACEHOLDER_PROVIDERS: [&str; 4] = ["gmail", "factiva", "youtube", "douyin"];

/// Per-source enablement. Keys are lowercased; unknown keys are kept but only
/// the recognized ones are ever consulted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceConfig {
    entries: HashMap<String, Value>,
    feeds: Vec<String>,
}

impl SourceConfig {
    /// Built-in default: every local source enabled (absent keys), no feeds.
    pub fn builtin_default() -> Self {
        Self::default()
    }

    /// Whether `key` is switched on; `default` applies when the key is absent.
    pub fn is_enabled(&self, key: &str, default: bool) -> bool {
        self.entries
            .get(&key.to_lowercase())
            .map(truthy)
            .unwrap_or(default)
    }

    /// Configured feed URLs, in configuration order.
    pub fn feed_urls(&self) -> &[String] {
        &self.feeds
    }

    /// Raw value for any key, including ones the aggregator ignores.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(&key.to_lowercase())
    }

    /// Build from an already-parsed document.
    pub fn from_map(map: Map<String, Value>) -> std::result::Result<Self, String> {
        let entries: HashMap<String, Value> =
            map.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect();
        let feeds = match entries.get(FEEDS_KEY) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Vec::new(),
            Some(Value::Array(items)) => feed_list(items)?,
            Some(other) => return Err(format!("`{FEEDS_KEY}` must be a list of URLs, got {other}")),
        };
        Ok(Self { entries, feeds })
    }
}

fn feed_list(items: &[Value]) -> std::result::Result<Vec<String>, String> {
    let mut out = Vec::with_capacity(items.len());
    for it in items {
        match it {
            Value::String(s) => {
                let t = s.trim();
                if !t.is_empty() {
                    out.push(t.to_string());
                }
            }
            other => return Err(format!("`{FEEDS_KEY}` entries must be strings, got {other}")),
        }
    }
    Ok(out)
}

/// Loose truthiness for boolean-ish keys (`0`, `""`, `[]`, `{}`, `null` are off).
fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Config path: $DIGEST_CONFIG_PATH, then `config.json` in the working dir.
pub fn default_config_path() -> PathBuf {
    std::env::var(ENV_CONFIG_PATH)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load source configuration from `path`.
///
/// A missing file yields [`SourceConfig::builtin_default`]. A file that exists but
/// cannot be read or parsed is a [`DigestError::Configuration`].
pub fn load_source_config(path: &Path) -> Result<SourceConfig> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no source config; using defaults");
            return Ok(SourceConfig::builtin_default());
        }
        Err(e) => return Err(DigestError::configuration(path, e)),
    };
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_source_config(&content, ext.as_str()).map_err(|reason| DigestError::configuration(path, reason))
}

/// Parse TOML when hinted by the extension, JSON otherwise.
pub fn parse_source_config(s: &str, hint_ext: &str) -> std::result::Result<SourceConfig, String> {
    let map = if hint_ext == "toml" {
        toml::from_str::<Map<String, Value>>(s).map_err(|e| e.to_string())?
    } else {
        match serde_json::from_str::<Value>(s).map_err(|e| e.to_string())? {
            Value::Object(m) => m,
            other => return Err(format!("expected a JSON object at top level, got {other}")),
        }
    };
    SourceConfig::from_map(map)
}
