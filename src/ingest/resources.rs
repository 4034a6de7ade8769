// src/ingest/resources.rs
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::ingest::types::ResourceProvider;

pub const ENV_SAMPLES_DIR: &str = "DIGEST_SAMPLES_DIR";
pub const DEFAULT_SAMPLES_DIR: &str = "samples";

/// Resource name backing each built-in local source.
pub fn resource_name_for(source: &str) -> Option<&'static str> {
    match source {
        "news" => Some("news_sample.txt"),
        "email" => Some("email_sample.txt"),
        "report" => Some("report_sample.txt"),
        _ => None,
    }
}

/// Text files under one directory.
#[derive(Debug, Clone)]
pub struct DirResources {
    root: PathBuf,
}

impl DirResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// $DIGEST_SAMPLES_DIR, falling back to `samples/`.
    pub fn from_env() -> Self {
        let root = std::env::var(ENV_SAMPLES_DIR)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SAMPLES_DIR.to_string());
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceProvider for DirResources {
    fn read(&self, name: &str) -> Option<String> {
        let path = self.root.join(name);
        match fs::read_to_string(&path) {
            Ok(s) => Some(s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                // Unreadable counts as missing; aggregation must not fail over one file.
                warn!(error = ?e, path = %path.display(), "resource unreadable");
                None
            }
        }
    }
}

/// In-memory resources, handy for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    items: HashMap<String, String>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, text: &str) -> Self {
        self.items.insert(name.to_string(), text.to_string());
        self
    }
}

impl ResourceProvider for MemoryResources {
    fn read(&self, name: &str) -> Option<String> {
        self.items.get(name).cloned()
    }
}
