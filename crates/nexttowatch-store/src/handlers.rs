// Request/response boundary in front of the store.
//
// Store operations return `Result<_, StoreError>`; callers of this module
// only ever see plain values: `false`, an empty watchlist or default settings
// stand in for any failure, which is logged here.

use nexttowatch_models::{ContentRef, ContentType, Settings, WatchHistoryEntry, WatchStatus, Watchlist};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use crate::error::StoreError;
use crate::store::WatchlistStore;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "operation", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Request {
    GetWatchlist,
    AddToWatchlist {
        item: ContentRef,
        #[serde(default)]
        status: Option<WatchStatus>,
    },
    RemoveFromWatchlist {
        id: String,
        content_type: ContentType,
    },
    UpdateContentStatus {
        id: String,
        content_type: ContentType,
        status: WatchStatus,
    },
    UpdateContentProgress {
        id: String,
        content_type: ContentType,
        progress: u32,
        total_episodes: u32,
    },
    GetWatchHistory,
    GetSettings,
    SaveSettings {
        settings: Settings,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Response {
    Watchlist(Watchlist),
    Success(bool),
    History(Vec<WatchHistoryEntry>),
    Settings(Settings),
}

fn collapse<T>(operation: &str, result: Result<T, StoreError>) -> bool {
    match result {
        Ok(_) => true,
        Err(e) if e.is_not_found() => {
            info!("{}: {}", operation, e);
            false
        }
        Err(e) => {
            warn!("{} failed: {}", operation, e);
            false
        }
    }
}

/// Reconciled watchlist; empty on any failure
pub fn get_watchlist(store: &WatchlistStore) -> Watchlist {
    store.watchlist().unwrap_or_else(|e| {
        warn!("get-watchlist failed, returning an empty watchlist: {}", e);
        Watchlist::new()
    })
}

pub fn add_to_watchlist(store: &WatchlistStore, item: ContentRef, status: Option<WatchStatus>) -> bool {
    collapse("add-to-watchlist", store.add_or_update(item, status))
}

/// Succeeds whether or not the item was present
pub fn remove_from_watchlist(store: &WatchlistStore, id: &str, content_type: ContentType) -> bool {
    collapse("remove-from-watchlist", store.remove(id, content_type))
}

pub fn update_content_status(store: &WatchlistStore, id: &str, content_type: ContentType, status: WatchStatus) -> bool {
    collapse("update-content-status", store.update_status(id, content_type, status))
}

pub fn update_content_progress(
    store: &WatchlistStore,
    id: &str,
    content_type: ContentType,
    progress: u32,
    total_episodes: u32,
) -> bool {
    collapse(
        "update-content-progress",
        store.update_progress(id, content_type, progress, total_episodes),
    )
}

pub fn get_watch_history(store: &WatchlistStore) -> Vec<WatchHistoryEntry> {
    store.watch_history().unwrap_or_else(|e| {
        warn!("get-watch-history failed, returning no history: {}", e);
        Vec::new()
    })
}

pub fn get_settings(store: &WatchlistStore) -> Settings {
    store.settings().unwrap_or_else(|e| {
        warn!("get-settings failed, returning defaults: {}", e);
        Settings::default()
    })
}

pub fn save_settings(store: &WatchlistStore, settings: Settings) -> bool {
    collapse("save-settings", store.save_settings(settings))
}

/// Route one boundary request to the store
pub fn dispatch(store: &WatchlistStore, request: Request) -> Response {
    debug!("Dispatching {:?}", request);
    match request {
        Request::GetWatchlist => Response::Watchlist(get_watchlist(store)),
        Request::AddToWatchlist { item, status } => Response::Success(add_to_watchlist(store, item, status)),
        Request::RemoveFromWatchlist { id, content_type } => {
            Response::Success(remove_from_watchlist(store, &id, content_type))
        }
        Request::UpdateContentStatus { id, content_type, status } => {
            Response::Success(update_content_status(store, &id, content_type, status))
        }
        Request::UpdateContentProgress {
            id,
            content_type,
            progress,
            total_episodes,
        } => Response::Success(update_content_progress(store, &id, content_type, progress, total_episodes)),
        Request::GetWatchHistory => Response::History(get_watch_history(store)),
        Request::GetSettings => Response::Settings(get_settings(store)),
        Request::SaveSettings { settings } => Response::Success(save_settings(store, settings)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::MirrorFile;
    use crate::primary::PrimaryStore;

    fn temp_store(dir: &tempfile::TempDir) -> WatchlistStore {
        WatchlistStore::new(
            PrimaryStore::new(dir.path().join("store.json")),
            MirrorFile::new(dir.path().join("watchlist.json")),
        )
    }

    #[test]
    fn test_request_wire_format() {
        let request: Request = serde_json::from_str(
            r#"{"operation": "update-content-progress", "id": "21", "contentType": "anime", "progress": 3, "totalEpisodes": 12}"#,
        )
        .unwrap();
        assert_eq!(
            request,
            Request::UpdateContentProgress {
                id: "21".to_string(),
                content_type: ContentType::Anime,
                progress: 3,
                total_episodes: 12,
            }
        );

        let request: Request = serde_json::from_str(
            r#"{"operation": "add-to-watchlist", "item": {"id": "tt001", "type": "movie", "title": "X"}, "status": "to-watch"}"#,
        )
        .unwrap();
        assert!(matches!(
            request,
            Request::AddToWatchlist { status: Some(WatchStatus::ToWatch), .. }
        ));
    }

    #[test]
    fn test_negative_progress_is_rejected_at_the_boundary() {
        let result = serde_json::from_str::<Request>(
            r#"{"operation": "update-content-progress", "id": "21", "contentType": "anime", "progress": -1, "totalEpisodes": 12}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_item_collapses_to_false() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);

        let response = dispatch(
            &store,
            Request::UpdateContentStatus {
                id: "tt404".to_string(),
                content_type: ContentType::Movie,
                status: WatchStatus::Watched,
            },
        );
        assert_eq!(response, Response::Success(false));
        assert!(get_watch_history(&store).is_empty());
    }

    #[test]
    fn test_unreadable_primary_collapses_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the primary file should be makes every read fail
        std::fs::create_dir(dir.path().join("store.json")).unwrap();
        let store = temp_store(&dir);

        assert_eq!(get_watchlist(&store), Watchlist::new());
        assert_eq!(get_settings(&store), Settings::default());
        assert!(!add_to_watchlist(
            &store,
            ContentRef::new("tt001", ContentType::Movie, "X"),
            None
        ));
    }

    #[test]
    fn test_settings_round_trip_through_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);

        let settings = Settings {
            theme: "light".to_string(),
            notifications: false,
            auto_update: true,
            language: "tr".to_string(),
        };
        assert_eq!(
            dispatch(&store, Request::SaveSettings { settings: settings.clone() }),
            Response::Success(true)
        );
        assert_eq!(dispatch(&store, Request::GetSettings), Response::Settings(settings));
        assert!(!store.mirror().exists());
    }

    #[test]
    fn test_response_serializes_bare_values() {
        assert_eq!(serde_json::to_string(&Response::Success(true)).unwrap(), "true");
        let value = serde_json::to_value(Response::Watchlist(Watchlist::new())).unwrap();
        assert_eq!(value, serde_json::json!({"anime": [], "movie": [], "series": []}));
    }
}
