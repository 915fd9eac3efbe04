use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

use crate::art::normalize::{DEFAULT_HOST_SUFFIX, DEFAULT_SIZE};

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    pub http: HttpConfig,
    pub art: ArtConfig,
    pub mock: MockConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            http: HttpConfig::default(),
            art: ArtConfig::default(),
            mock: MockConfig::default(),
        }
    }
}

impl Config {
    /// Reads the config file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        if !path.exists() {
            log::warn!("config {} not found, using defaults", path.display());
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ArtConfig {
    /// only urls on this host get their size rewritten
    pub host_suffix: String,
    /// pixel sizes to request, preferred first
    pub sizes: Vec<u32>,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub referer: String,
    /// bodies larger than this are rejected
    pub max_bytes: u64,
}

impl Default for ArtConfig {
    fn default() -> Self {
        Self {
            host_suffix: DEFAULT_HOST_SUFFIX.to_string(),
            sizes: vec![DEFAULT_SIZE, 544],
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
                .to_string(),
            referer: "https://music.youtube.com/".to_string(),
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MockConfig {
    pub webhook_url: String,
    pub interval_ms: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            webhook_url: "http://localhost:8080/webhook".to_string(),
            interval_ms: 1000,
        }
    }
}
