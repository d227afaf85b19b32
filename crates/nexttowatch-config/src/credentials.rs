use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// TOML key/value file holding catalog API keys
pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    /// OMDb key; `OMDB_API_KEY` in the environment takes precedence over the file
    pub fn get_omdb_api_key(&self) -> Option<String> {
        std::env::var("OMDB_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.get("omdb_api_key").filter(|k| !k.is_empty()).cloned())
    }

    pub fn set_omdb_api_key(&mut self, key: String) {
        self.set("omdb_api_key".to_string(), key);
    }
}
