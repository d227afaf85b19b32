use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Which representation wins when both the primary store and the mirror
/// file hold watchlist data
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcilePolicy {
    /// The primary store overwrites the mirror whenever it has any data
    #[default]
    PrimaryWins,
    /// A mirror modified after the last primary write is adopted instead
    Newest,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub reconcile_policy: ReconcilePolicy,
    /// Override for the primary store file (defaults to `<data>/store.json`)
    #[serde(default)]
    pub primary_path: Option<PathBuf>,
    /// Override for the mirror file (defaults to `<data>/watchlist.json`)
    #[serde(default)]
    pub mirror_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_anime_page_limit")]
    pub anime_page_limit: u32,
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_jikan_base_url")]
    pub jikan_base_url: String,
    #[serde(default = "default_omdb_base_url")]
    pub omdb_base_url: String,
}

fn default_timeout_seconds() -> u64 {
    8
}

fn default_anime_page_limit() -> u32 {
    15
}

fn default_request_delay_ms() -> u64 {
    400 // Jikan rate limit
}

fn default_jikan_base_url() -> String {
    "https://api.jikan.moe/v4".to_string()
}

fn default_omdb_base_url() -> String {
    "http://www.omdbapi.com/".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            anime_page_limit: default_anime_page_limit(),
            request_delay_ms: default_request_delay_ms(),
            jikan_base_url: default_jikan_base_url(),
            omdb_base_url: default_omdb_base_url(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, or fall back to defaults when it does not exist yet
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "catalog.timeout_seconds",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.catalog.anime_page_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "catalog.anime_page_limit",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.catalog.jikan_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "catalog.jikan_base_url",
                reason: "cannot be empty".to_string(),
            });
        }
        if self.catalog.omdb_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "catalog.omdb_base_url",
                reason: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
