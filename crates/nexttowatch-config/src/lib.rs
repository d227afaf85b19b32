pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{CatalogConfig, Config, ConfigError, ReconcilePolicy, StoreConfig};
pub use credentials::CredentialStore;
pub use paths::{PathManager, base_path_override};
