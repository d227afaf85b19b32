use chrono::{DateTime, Utc};
use nexttowatch_models::Watchlist;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use crate::error::StoreError;

/// Plain, pretty-printed JSON copy of the watchlist at a fixed path
#[derive(Debug, Clone)]
pub struct MirrorFile {
    path: PathBuf,
}

impl MirrorFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the mirror. `Ok(None)` when the file is absent or does not parse.
    pub fn read(&self) -> Result<Option<Watchlist>, StoreError> {
        if !self.path.exists() {
            debug!("Mirror miss: {:?} does not exist", self.path);
            return Ok(None);
        }

        // Raw bytes: invalid UTF-8 is corrupt content, not an I/O failure
        let content = std::fs::read(&self.path).map_err(|e| StoreError::io("read", &self.path, e))?;

        match serde_json::from_slice::<Watchlist>(&content) {
            Ok(watchlist) => {
                debug!("Mirror hit: {} items", watchlist.len());
                Ok(Some(watchlist))
            }
            Err(e) => {
                warn!("Mirror file {:?} is corrupt, ignoring it for this read: {}", self.path, e);
                Ok(None)
            }
        }
    }

    pub fn write(&self, watchlist: &Watchlist) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io("create directory", parent, e))?;
        }

        let json = serde_json::to_string_pretty(watchlist).map_err(|source| StoreError::Serialize {
            what: "mirror watchlist",
            source,
        })?;
        std::fs::write(&self.path, json).map_err(|e| StoreError::io("write", &self.path, e))?;

        debug!("Mirror saved: {} items", watchlist.len());
        Ok(())
    }

    /// Last modification time of the file, if it exists
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        std::fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexttowatch_models::{ContentRef, ContentType, WatchStatus};

    #[test]
    fn test_absent_mirror_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = MirrorFile::new(dir.path().join("watchlist.json"));
        assert!(mirror.read().unwrap().is_none());
        assert!(mirror.modified_at().is_none());
    }

    #[test]
    fn test_corrupt_mirror_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.json");
        std::fs::write(&path, "[1, 2,").unwrap();

        let mirror = MirrorFile::new(&path);
        assert!(mirror.read().unwrap().is_none());
        // Left in place; the next reconciliation overwrites it
        assert!(path.exists());
    }

    #[test]
    fn test_non_utf8_mirror_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.json");
        std::fs::write(&path, [0xff, 0xfe, 0x7b]).unwrap();

        assert!(MirrorFile::new(&path).read().unwrap().is_none());
    }

    #[test]
    fn test_written_mirror_reads_back_equal() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = MirrorFile::new(dir.path().join("watchlist.json"));

        let mut watchlist = Watchlist::new();
        let mut history = Vec::new();
        let mut content = ContentRef::new("5114", ContentType::Anime, "Fullmetal Alchemist: Brotherhood");
        content.image = Some("https://cdn.example/fma.jpg".to_string());
        content.extra.insert("score".to_string(), serde_json::json!(9.1));
        crate::update::add_or_update(&mut watchlist, &mut history, content, Some(WatchStatus::Watching), Utc::now());
        crate::update::add_or_update(
            &mut watchlist,
            &mut history,
            ContentRef::new("tt0903747", ContentType::Series, "Breaking Bad"),
            Some(WatchStatus::Watched),
            Utc::now(),
        );

        mirror.write(&watchlist).unwrap();
        assert_eq!(mirror.read().unwrap(), Some(watchlist));

        let raw = std::fs::read_to_string(mirror.path()).unwrap();
        assert!(raw.contains("\n  \"anime\": ["), "mirror should be pretty-printed");
    }
}
