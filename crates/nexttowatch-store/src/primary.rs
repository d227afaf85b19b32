use chrono::{DateTime, Utc};
use nexttowatch_models::{Settings, WatchHistoryEntry, Watchlist};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use crate::error::StoreError;

/// Everything the primary store persists
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreDocument {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub watchlist: Watchlist,
    #[serde(default)]
    pub watch_history: Vec<WatchHistoryEntry>,
    /// Time of the last primary write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    /// Modification time of the mirror file right after the store last wrote it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_synced_at: Option<DateTime<Utc>>,
}

/// The structured JSON document holding settings, watchlist and history
#[derive(Debug, Clone)]
pub struct PrimaryStore {
    path: PathBuf,
}

impl PrimaryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document; a missing file is an empty store.
    ///
    /// An unparseable document is copied to `*.json.bak` and replaced by an
    /// empty one, so the next reconciliation can refill it from the mirror.
    pub fn load(&self) -> Result<StoreDocument, StoreError> {
        if !self.path.exists() {
            debug!("Primary store {:?} does not exist, starting empty", self.path);
            return Ok(StoreDocument::default());
        }

        let content = std::fs::read(&self.path).map_err(|e| StoreError::io("read", &self.path, e))?;

        match serde_json::from_slice::<StoreDocument>(&content) {
            Ok(document) => {
                debug!(
                    "Primary store loaded: {} watchlist items, {} history entries",
                    document.watchlist.len(),
                    document.watch_history.len()
                );
                Ok(document)
            }
            Err(e) => {
                let backup_path = self.path.with_extension("json.bak");
                if let Err(backup_err) = std::fs::copy(&self.path, &backup_path) {
                    warn!(
                        "Primary store is corrupt ({}) and could not be backed up: {}. Starting empty.",
                        e, backup_err
                    );
                } else {
                    info!(
                        "Primary store is corrupt ({}). Backed up to {:?} and starting empty.",
                        e, backup_path
                    );
                }
                Ok(StoreDocument::default())
            }
        }
    }

    /// Write the document, stamping `saved_at`
    pub fn save(&self, document: &mut StoreDocument) -> Result<(), StoreError> {
        document.saved_at = Some(Utc::now());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io("create directory", parent, e))?;
        }

        let json = serde_json::to_string_pretty(document).map_err(|source| StoreError::Serialize {
            what: "primary store",
            source,
        })?;

        // Write to a temp file first so a crash never leaves a half-written primary
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, json).map_err(|e| StoreError::io("write", &temp_path, e))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| StoreError::io("replace", &self.path, e))?;

        debug!("Primary store saved: {} watchlist items", document.watchlist.len());
        Ok(())
    }
}
