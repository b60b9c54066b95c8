use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Environment variable that overrides the configured OMDb API key
pub const API_KEY_ENV: &str = "POPCORN_OMDB_API_KEY";

pub const DEFAULT_OMDB_URL: &str = "https://www.omdbapi.com/";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Slot name the watched list is persisted under
    #[serde(default = "default_watched_slot")]
    pub watched_slot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Window title shown while no movie is open
    #[serde(default = "default_title")]
    pub default_title: String,
    /// Prefix for the window title while a movie is open
    #[serde(default = "default_detail_title_prefix")]
    pub detail_title_prefix: String,
}

fn default_api_key() -> String {
    "bcd56b42".to_string()
}

fn default_base_url() -> String {
    DEFAULT_OMDB_URL.to_string()
}

fn default_watched_slot() -> String {
    "watched".to_string()
}

fn default_title() -> String {
    "usePopcorn".to_string()
}

fn default_detail_title_prefix() -> String {
    "Movie:- ".to_string()
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_base_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            watched_slot: default_watched_slot(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_title: default_title(),
            detail_title_prefix: default_detail_title_prefix(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if present, otherwise fall back to defaults.
    ///
    /// Environment overrides are applied in both cases.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            info!("Loading config from {}", path.display());
            Self::load_from_file(path)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
    }

    fn apply_api_key_override(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
            debug!("Using OMDb API key from {}", API_KEY_ENV);
            self.omdb.api_key = key;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.omdb.api_key.trim().is_empty() {
            anyhow::bail!("OMDb API key is empty. Run 'popcorn config set-key <KEY>' or set {}", API_KEY_ENV);
        }

        if !(self.omdb.base_url.starts_with("http://") || self.omdb.base_url.starts_with("https://")) {
            anyhow::bail!("OMDb base URL must start with http:// or https:// (got '{}')", self.omdb.base_url);
        }

        if self.storage.watched_slot.trim().is_empty() {
            anyhow::bail!("Storage slot name for the watched list cannot be empty");
        }

        Ok(())
    }
}

impl DisplayConfig {
    /// Window title shown while `title` is open
    pub fn detail_title(&self, title: &str) -> String {
        format!("{}{}", self.detail_title_prefix, title)
    }
}
