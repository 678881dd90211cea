// src/config/feed.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const ENV_CONFIG_PATH: &str = "JOBBOARD_CONFIG_PATH";
pub const ENV_LISTING_URL: &str = "JOB_LISTING_URL";

pub const DEFAULT_LISTING_URL: &str = "http://127.0.0.1:8000/api/jobs";
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 4_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Where and how to reach the listing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub listing_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            user_agent: concat!("jobboard/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FeedConfig {
    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading feed config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing feed config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Resolve config using env var + fallbacks:
    /// 1) $JOBBOARD_CONFIG_PATH
    /// 2) config/feed.toml
    /// 3) config/feed.json
    /// 4) built-in defaults
    ///
    /// `$JOB_LISTING_URL` then overrides the listing URL.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from_file(&pb)?
        } else {
            let toml_p = PathBuf::from("config/feed.toml");
            let json_p = PathBuf::from("config/feed.json");
            if toml_p.exists() {
                Self::load_from_file(&toml_p)?
            } else if json_p.exists() {
                Self::load_from_file(&json_p)?
            } else {
                Self::default()
            }
        };

        if let Ok(url) = env::var(ENV_LISTING_URL) {
            let url = url.trim();
            if !url.is_empty() {
                cfg.listing_url = url.to_string();
            }
        }
        Ok(cfg)
    }

    /// Replace blank or zero values with defaults.
    fn sanitized(mut self) -> Self {
        let d = Self::default();
        if self.listing_url.trim().is_empty() {
            self.listing_url = d.listing_url;
        } else {
            self.listing_url = self.listing_url.trim().to_string();
        }
        if self.connect_timeout_ms == 0 {
            self.connect_timeout_ms = d.connect_timeout_ms;
        }
        if self.request_timeout_ms == 0 {
            self.request_timeout_ms = d.request_timeout_ms;
        }
        if self.user_agent.trim().is_empty() {
            self.user_agent = d.user_agent;
        }
        self
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<FeedConfig> {
    match hint_ext {
        "toml" => Ok(toml::from_str(s)?),
        "json" => Ok(serde_json::from_str(s)?),
        // Unknown extension: JSON if it looks like an object, else TOML.
        _ if s.trim_start().starts_with('{') => Ok(serde_json::from_str(s)?),
        _ => Ok(toml::from_str(s)?),
    }
}
