pub mod catalog;
pub mod config;
pub mod settings;
pub mod watchlist;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use nexttowatch_catalog::ContentAggregator;
use nexttowatch_config::{Config, CredentialStore, PathManager};
use nexttowatch_store::WatchlistStore;
use tracing::{debug, warn};

/// Paths and configuration shared by every command
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        paths
            .ensure_directories()
            .map_err(|e| eyre!("Failed to create data directories: {}", e))?;

        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config.validate()?;
        debug!("Loaded configuration from {}", config_file.display());

        Ok(Self { paths, config })
    }

    pub fn credentials(&self) -> Result<CredentialStore> {
        let mut credentials = CredentialStore::new(self.paths.credentials_file());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials: {}", e))?;
        Ok(credentials)
    }

    pub fn aggregator(&self) -> Result<ContentAggregator> {
        let api_key = self.credentials()?.get_omdb_api_key();
        Ok(ContentAggregator::from_config(&self.config.catalog, api_key)?)
    }

    /// Run `f` against the store, then reconcile both files once more before exiting
    pub fn with_store<T>(&self, f: impl FnOnce(&WatchlistStore) -> Result<T>) -> Result<T> {
        let store = WatchlistStore::from_config(&self.paths, &self.config.store);
        let result = f(&store);
        if let Err(e) = store.shutdown() {
            warn!("Final reconciliation failed: {}", e);
        }
        result
    }
}
