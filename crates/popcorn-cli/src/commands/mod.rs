pub mod config;
pub mod progress;
pub mod prompts;
pub mod search;
pub mod tui;
pub mod watched;

use color_eyre::{Report, Result};
use popcorn_config::{Config, PathManager};
use popcorn_core::{FileSlotStore, SlotStore, WatchedList};
use popcorn_sources::{OmdbClient, SourceError};
use std::sync::Arc;

/// Paths, config and the concrete backends every command needs
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        paths.ensure_directories().map_err(|e| {
            color_eyre::eyre::eyre!("Failed to create directories under {}: {}", paths.config_dir().display(), e)
        })?;

        let config = Config::load_or_default(&paths.config_file())
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load {}: {}", paths.config_file().display(), e))?;
        config.validate().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

        Ok(Self { paths, config })
    }

    pub fn catalog(&self) -> OmdbClient {
        OmdbClient::from_config(&self.config.omdb)
    }

    pub fn store(&self) -> Arc<dyn SlotStore> {
        Arc::new(FileSlotStore::new(self.paths.storage_dir()))
    }

    pub fn watched_list(&self) -> WatchedList {
        WatchedList::load(self.store(), &self.config.storage.watched_slot)
    }
}

/// Turn a failed catalog call into the command's error; the message is the one the TUI shows
pub fn fetch_failed(operation: &str, error: SourceError) -> Report {
    tracing::debug!(operation, error = ?error, "Catalog request failed");
    color_eyre::eyre::eyre!("{}", error)
}
