pub mod config;
pub mod paths;

pub use config::{Config, DisplayConfig, OmdbConfig, StorageConfig, API_KEY_ENV, DEFAULT_OMDB_URL};
pub use paths::{PathManager, base_path_override};
