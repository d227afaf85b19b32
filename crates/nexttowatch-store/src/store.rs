use chrono::Utc;
use nexttowatch_config::{PathManager, ReconcilePolicy, StoreConfig};
use nexttowatch_models::{ContentRef, ContentType, Settings, WatchHistoryEntry, WatchStatus, Watchlist};
use tracing::{debug, info};
use crate::error::StoreError;
use crate::mirror::MirrorFile;
use crate::primary::{PrimaryStore, StoreDocument};
use crate::reconcile::{plan_reconcile, ReconcileAction};
use crate::update::{self, AddOutcome};

/// Single owner of the watchlist and both of its on-disk representations.
///
/// Every operation is a read-modify-write against the files; nothing is
/// cached in memory and nothing is locked, so two interleaved writers can
/// lose an update.
#[derive(Debug, Clone)]
pub struct WatchlistStore {
    primary: PrimaryStore,
    mirror: MirrorFile,
    policy: ReconcilePolicy,
}

impl WatchlistStore {
    pub fn new(primary: PrimaryStore, mirror: MirrorFile) -> Self {
        Self {
            primary,
            mirror,
            policy: ReconcilePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build a store from the standard data layout, honoring path overrides
    pub fn from_config(paths: &PathManager, config: &StoreConfig) -> Self {
        let primary_path = config.primary_path.clone().unwrap_or_else(|| paths.store_file());
        let mirror_path = config.mirror_path.clone().unwrap_or_else(|| paths.mirror_file());
        Self::new(PrimaryStore::new(primary_path), MirrorFile::new(mirror_path)).with_policy(config.reconcile_policy)
    }

    pub fn primary(&self) -> &PrimaryStore {
        &self.primary
    }

    pub fn mirror(&self) -> &MirrorFile {
        &self.mirror
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    /// Write the mirror, then the primary stamped with the mirror's new
    /// modification time. The primary is written even if the mirror fails.
    fn persist(&self, document: &mut StoreDocument) -> Result<(), StoreError> {
        let mirror_result = self.mirror.write(&document.watchlist);
        if mirror_result.is_ok() {
            document.mirror_synced_at = self.mirror.modified_at();
        }
        self.primary.save(document)?;
        mirror_result
    }

    /// Run one reconciliation pass and return the resulting primary document
    fn reconcile_document(&self) -> Result<(ReconcileAction, StoreDocument), StoreError> {
        let mut document = self.primary.load()?;
        let mirror = self.mirror.read()?;
        let action = plan_reconcile(
            &document.watchlist,
            document.mirror_synced_at,
            mirror.as_ref(),
            self.mirror.modified_at(),
            self.policy,
        );

        match (action, mirror) {
            (ReconcileAction::AdoptMirror, Some(mirrored)) => {
                info!(
                    "Reconcile: adopting {} items from mirror {:?}",
                    mirrored.len(),
                    self.mirror.path()
                );
                document.watchlist = mirrored;
                document.mirror_synced_at = self.mirror.modified_at();
                self.primary.save(&mut document)?;
            }
            (ReconcileAction::WriteMirror, _) => {
                info!(
                    "Reconcile: writing {} items to mirror {:?}",
                    document.watchlist.len(),
                    self.mirror.path()
                );
                self.persist(&mut document)?;
            }
            (action, _) => debug!("Reconcile: {:?}", action),
        }

        Ok((action, document))
    }

    /// Reconcile the two representations without reading the result
    pub fn reconcile(&self) -> Result<ReconcileAction, StoreError> {
        self.reconcile_document().map(|(action, _)| action)
    }

    /// Final reconciliation before the process exits
    pub fn shutdown(&self) -> Result<ReconcileAction, StoreError> {
        let action = self.reconcile()?;
        debug!("Store shut down after {:?}", action);
        Ok(action)
    }

    pub fn watchlist(&self) -> Result<Watchlist, StoreError> {
        self.reconcile_document().map(|(_, document)| document.watchlist)
    }

    /// Current primary document after a reconciliation pass.
    ///
    /// Mutations start from here so that a mirror adopted into an empty
    /// primary is not overwritten by the first write.
    fn load_reconciled(&self) -> Result<StoreDocument, StoreError> {
        self.reconcile_document().map(|(_, document)| document)
    }

    pub fn add_or_update(&self, content: ContentRef, status: Option<WatchStatus>) -> Result<AddOutcome, StoreError> {
        let mut document = self.load_reconciled()?;
        let id = content.id.clone();
        let content_type = content.content_type;

        let outcome = update::add_or_update(
            &mut document.watchlist,
            &mut document.watch_history,
            content,
            status,
            Utc::now(),
        );
        self.persist(&mut document)?;

        info!("{:?} {} '{}' in watchlist", outcome, content_type, id);
        Ok(outcome)
    }

    /// Remove an item; returns whether it was present
    pub fn remove(&self, id: &str, content_type: ContentType) -> Result<bool, StoreError> {
        let mut document = self.load_reconciled()?;
        let removed = update::remove(&mut document.watchlist, id, content_type);
        self.persist(&mut document)?;

        if removed {
            info!("Removed {} '{}' from watchlist", content_type, id);
        } else {
            debug!("Remove: {} '{}' was not in the watchlist", content_type, id);
        }
        Ok(removed)
    }

    pub fn update_status(&self, id: &str, content_type: ContentType, status: WatchStatus) -> Result<(), StoreError> {
        let mut document = self.load_reconciled()?;
        update::update_status(
            &mut document.watchlist,
            &mut document.watch_history,
            id,
            content_type,
            status,
            Utc::now(),
        )?;
        self.persist(&mut document)?;

        info!("Status of {} '{}' set to {}", content_type, id, status);
        Ok(())
    }

    pub fn update_progress(
        &self,
        id: &str,
        content_type: ContentType,
        progress: u32,
        total_episodes: u32,
    ) -> Result<WatchStatus, StoreError> {
        let mut document = self.load_reconciled()?;
        let status = update::update_progress(
            &mut document.watchlist,
            &mut document.watch_history,
            id,
            content_type,
            progress,
            total_episodes,
            Utc::now(),
        )?;
        self.persist(&mut document)?;

        info!(
            "Progress of {} '{}' set to {}/{} ({})",
            content_type, id, progress, total_episodes, status
        );
        Ok(status)
    }

    pub fn watch_history(&self) -> Result<Vec<WatchHistoryEntry>, StoreError> {
        self.primary.load().map(|document| document.watch_history)
    }

    pub fn settings(&self) -> Result<Settings, StoreError> {
        self.primary.load().map(|document| document.settings)
    }

    /// Replace the settings section; the mirror carries no settings and is not touched
    pub fn save_settings(&self, settings: Settings) -> Result<(), StoreError> {
        let mut document = self.primary.load()?;
        document.settings = settings;
        self.primary.save(&mut document)?;
        info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
