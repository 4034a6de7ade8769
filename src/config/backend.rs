// src/config/backend.rs
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_MODEL: &str = "DIGEST_OPENAI_MODEL";
pub const ENV_OPENAI_BASE_URL: &str = "DIGEST_OPENAI_BASE_URL";
pub const ENV_BACKEND_TIMEOUT_SECS: &str = "DIGEST_BACKEND_TIMEOUT_SECS";

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_tokens() -> u32 {
    256
}
fn default_temperature() -> f32 {
    0.3
}

/// Settings for the OpenAI-compatible backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Empty means "no key": the backend then misses on every call.
    /// "ENV" in a settings file means: read from OPENAI_API_KEY.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl BackendSettings {
    /// Defaults overridden by whatever the environment provides.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(key) = env::var(ENV_OPENAI_API_KEY) {
            cfg.api_key = key.trim().to_string();
        }
        if let Some(model) = non_empty_env(ENV_OPENAI_MODEL) {
            cfg.model = model;
        }
        if let Some(url) = non_empty_env(ENV_OPENAI_BASE_URL) {
            cfg.base_url = url;
        }
        if let Some(secs) = non_empty_env(ENV_BACKEND_TIMEOUT_SECS).and_then(|s| s.parse().ok()) {
            cfg.timeout_secs = secs;
        }
        cfg
    }

    /// Load from a JSON file. Unlike source configuration, a broken backend file
    /// is an error for the caller to report.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: BackendSettings = serde_json::from_str(&data)?;

        if cfg.api_key.trim().eq_ignore_ascii_case("env") {
            cfg.api_key = env::var(ENV_OPENAI_API_KEY)
                .map_err(|_| anyhow::anyhow!("Missing {ENV_OPENAI_API_KEY} env var"))?;
        }
        cfg.base_url = cfg.base_url.trim_end_matches('/').to_string();

        if !(0.0..=2.0).contains(&cfg.temperature) {
            cfg.temperature = default_temperature();
        }
        if cfg.max_tokens == 0 {
            cfg.max_tokens = default_max_tokens();
        }

        Ok(cfg)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
