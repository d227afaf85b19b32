use anyhow::Result;
use std::path::{Path, PathBuf};

/// Base directory override, read from `NEXTTOWATCH_BASE_PATH`
pub fn base_path_override() -> Option<PathBuf> {
    std::env::var("NEXTTOWATCH_BASE_PATH")
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}

#[derive(Debug, Clone)]
pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("nexttowatch");

        Ok(Self::from_base(base_dir))
    }

    /// Lay out config, data and logs under a single directory
    pub fn from_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Primary structured store: settings, watchlist and watch history
    pub fn store_file(&self) -> PathBuf {
        self.data_dir.join("store.json")
    }

    /// Plain JSON mirror of the watchlist
    pub fn mirror_file(&self) -> PathBuf {
        self.data_dir.join("watchlist.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("nexttowatch.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Some(base) = base_path_override() {
            return Self::from_base(base);
        }

        // Platform config dir (~/.config/nexttowatch on Linux), falling back to the working directory
        Self::new().unwrap_or_else(|_| Self::from_base(".nexttowatch"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_base() {
        let paths = PathManager::from_base("/tmp/ntw");
        assert_eq!(paths.store_file(), PathBuf::from("/tmp/ntw/data/store.json"));
        assert_eq!(paths.mirror_file(), PathBuf::from("/tmp/ntw/data/watchlist.json"));
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/ntw/config.toml"));
        assert_eq!(paths.log_file(), PathBuf::from("/tmp/ntw/logs/nexttowatch.log"));
    }
}
