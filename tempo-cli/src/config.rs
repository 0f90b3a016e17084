use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tempo_events::{SortOrder, DEFAULT_BASE_URL, DEFAULT_TITLE};

const API_URL_ENV: &str = "TEMPO_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempoConfig {
    /// Base URL of the events backend, e.g. "http://localhost:3001"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Title given to entries created by `tempo stop`
    #[serde(default = "default_title")]
    pub default_title: String,
    #[serde(default)]
    pub sort_order: SortOrder,
}

fn default_api_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            default_title: default_title(),
            sort_order: SortOrder::default(),
        }
    }
}

pub fn root_path() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Cannot determine config directory")?
        .join("tempo"))
}

impl TempoConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(root_path()?.join("config.toml"))
    }

    /// Load config from disk, then apply environment overrides.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        if let Ok(api_url) = std::env::var(API_URL_ENV) {
            if !api_url.trim().is_empty() {
                config.api_url = api_url;
            }
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}
