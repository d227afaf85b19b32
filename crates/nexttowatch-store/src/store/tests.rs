use super::*;
use chrono::Duration;
use crate::handlers;
use nexttowatch_models::WatchlistItem;
use std::collections::BTreeMap;
use tempfile::TempDir;

fn temp_store() -> (TempDir, WatchlistStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = WatchlistStore::new(
        PrimaryStore::new(dir.path().join("store.json")),
        MirrorFile::new(dir.path().join("watchlist.json")),
    );
    (dir, store)
}

fn movie(id: &str, title: &str) -> ContentRef {
    ContentRef::new(id, ContentType::Movie, title)
}

fn mirror_item(id: &str, content_type: ContentType, title: &str) -> WatchlistItem {
    let now = Utc::now();
    WatchlistItem {
        id: id.to_string(),
        content_type,
        title: title.to_string(),
        poster: None,
        image: None,
        year: Some("2001".to_string()),
        status: WatchStatus::ToWatch,
        progress: 0,
        total_episodes: 0,
        rating: 0.0,
        added_at: now,
        updated_at: now,
        watched_at: None,
        extra: BTreeMap::new(),
    }
}

#[test]
fn test_scenario_add_watch_remove() {
    let (_dir, store) = temp_store();

    assert!(handlers::add_to_watchlist(&store, movie("tt001", "X"), Some(WatchStatus::ToWatch)));
    let watchlist = handlers::get_watchlist(&store);
    let item = watchlist.find("tt001", ContentType::Movie).unwrap();
    assert_eq!(item.progress, 0);
    assert_eq!(item.status, WatchStatus::ToWatch);

    assert!(handlers::update_content_status(&store, "tt001", ContentType::Movie, WatchStatus::Watched));
    let watchlist = handlers::get_watchlist(&store);
    let item = watchlist.find("tt001", ContentType::Movie).unwrap();
    assert_eq!(item.status, WatchStatus::Watched);
    assert!(item.watched_at.is_some());

    let history = handlers::get_watch_history(&store);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, "tt001");
    assert_eq!(history[0].content_type, ContentType::Movie);
    assert_eq!(history[0].title, "X");

    assert!(handlers::remove_from_watchlist(&store, "tt001", ContentType::Movie));
    let watchlist = handlers::get_watchlist(&store);
    assert!(watchlist.find("tt001", ContentType::Movie).is_none());
    // History is append-only and survives removal
    assert_eq!(handlers::get_watch_history(&store).len(), 1);
}

#[test]
fn test_every_mutation_updates_both_representations() {
    let (_dir, store) = temp_store();

    store.add_or_update(movie("tt001", "X"), None).unwrap();
    store.update_progress("tt001", ContentType::Movie, 1, 0).unwrap();

    let primary = store.primary().load().unwrap();
    let mirror = store.mirror().read().unwrap().unwrap();
    assert_eq!(primary.watchlist, mirror);
    assert_eq!(mirror.movie[0].status, WatchStatus::Watching);
    assert_eq!(primary.mirror_synced_at, store.mirror().modified_at());
}

#[test]
fn test_merge_on_add_does_not_duplicate() {
    let (_dir, store) = temp_store();

    assert_eq!(store.add_or_update(movie("tt001", "X"), None).unwrap(), AddOutcome::Inserted);
    let before = store.watchlist().unwrap().movie[0].clone();

    let mut update = movie("tt001", "X (Director's Cut)");
    update.poster = Some("https://img.example/x.jpg".to_string());
    assert_eq!(store.add_or_update(update, None).unwrap(), AddOutcome::Merged);

    let watchlist = store.watchlist().unwrap();
    assert_eq!(watchlist.movie.len(), 1);
    let after = &watchlist.movie[0];
    assert_eq!(after.title, "X (Director's Cut)");
    assert_eq!(after.poster.as_deref(), Some("https://img.example/x.jpg"));
    assert_eq!(after.added_at, before.added_at);
    assert!(after.updated_at >= before.updated_at);
}

#[test]
fn test_remove_twice_leaves_same_state() {
    let (_dir, store) = temp_store();
    store.add_or_update(movie("tt001", "X"), None).unwrap();
    store.add_or_update(movie("tt002", "Y"), None).unwrap();

    assert!(store.remove("tt001", ContentType::Movie).unwrap());
    let once = store.watchlist().unwrap();
    assert!(!store.remove("tt001", ContentType::Movie).unwrap());
    let twice = store.watchlist().unwrap();

    assert_eq!(once, twice);
    assert!(handlers::remove_from_watchlist(&store, "tt001", ContentType::Movie));
}

#[test]
fn test_progress_to_completion_writes_history() {
    let (_dir, store) = temp_store();
    store
        .add_or_update(ContentRef::new("21", ContentType::Anime, "One Piece"), None)
        .unwrap();

    assert_eq!(
        store.update_progress("21", ContentType::Anime, 5, 12).unwrap(),
        WatchStatus::Watching
    );
    assert!(store.watch_history().unwrap().is_empty());

    assert_eq!(
        store.update_progress("21", ContentType::Anime, 12, 12).unwrap(),
        WatchStatus::Watched
    );
    let watchlist = store.watchlist().unwrap();
    let item = watchlist.find("21", ContentType::Anime).unwrap();
    assert!(item.watched_at.is_some());
    assert_eq!(item.progress, 12);

    let history = store.watch_history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, "21");
    assert_eq!(history[0].title, "One Piece");
}

#[test]
fn test_updates_on_missing_items_fail() {
    let (_dir, store) = temp_store();

    assert!(store
        .update_status("tt404", ContentType::Movie, WatchStatus::Watching)
        .unwrap_err()
        .is_not_found());
    assert!(!handlers::update_content_progress(&store, "tt404", ContentType::Movie, 1, 2));
}

#[test]
fn test_empty_primary_adopts_mirror() {
    let (_dir, store) = temp_store();
    let mut mirrored = Watchlist::new();
    mirrored.anime.push(mirror_item("1", ContentType::Anime, "Cowboy Bebop"));
    mirrored.series.push(mirror_item("tt0903747", ContentType::Series, "Breaking Bad"));
    store.mirror().write(&mirrored).unwrap();

    assert_eq!(store.reconcile().unwrap(), ReconcileAction::AdoptMirror);
    assert_eq!(store.primary().load().unwrap().watchlist, mirrored);
    assert_eq!(store.watchlist().unwrap(), mirrored);
}

#[test]
fn test_first_mutation_keeps_mirror_content() {
    let (_dir, store) = temp_store();
    let mut mirrored = Watchlist::new();
    mirrored.movie.push(mirror_item("tt100", ContentType::Movie, "From Mirror"));
    store.mirror().write(&mirrored).unwrap();

    store.add_or_update(movie("tt200", "New"), None).unwrap();

    let watchlist = store.watchlist().unwrap();
    assert!(watchlist.find("tt100", ContentType::Movie).is_some());
    assert!(watchlist.find("tt200", ContentType::Movie).is_some());
}

#[test]
fn test_primary_with_data_overwrites_mirror() {
    let (_dir, store) = temp_store();
    store.add_or_update(movie("tt001", "X"), None).unwrap();

    // External edit replaces the mirror with different content
    let mut edited = Watchlist::new();
    edited.movie.push(mirror_item("tt999", ContentType::Movie, "Edited"));
    store.mirror().write(&edited).unwrap();

    let primary = store.primary().load().unwrap().watchlist;
    assert_eq!(store.reconcile().unwrap(), ReconcileAction::WriteMirror);
    assert_eq!(store.mirror().read().unwrap(), Some(primary));
}

#[test]
fn test_missing_mirror_is_recreated() {
    let (_dir, store) = temp_store();
    store.add_or_update(movie("tt001", "X"), None).unwrap();
    std::fs::remove_file(store.mirror().path()).unwrap();

    let watchlist = store.watchlist().unwrap();
    assert_eq!(store.mirror().read().unwrap(), Some(watchlist));
}

#[test]
fn test_corrupt_mirror_heals_from_primary() {
    let (_dir, store) = temp_store();
    store.add_or_update(movie("tt001", "X"), None).unwrap();
    std::fs::write(store.mirror().path(), "{\"movie\": [oops").unwrap();

    let watchlist = handlers::get_watchlist(&store);
    assert_eq!(watchlist.movie.len(), 1);
    assert_eq!(store.mirror().read().unwrap(), Some(watchlist));
}

#[test]
fn test_non_utf8_mirror_heals_on_next_mutation() {
    let (_dir, store) = temp_store();
    store.add_or_update(movie("tt001", "X"), None).unwrap();
    std::fs::write(store.mirror().path(), [0xff, 0xfe, 0x7b]).unwrap();

    assert!(handlers::add_to_watchlist(&store, movie("tt002", "Y"), None));

    let watchlist = handlers::get_watchlist(&store);
    assert_eq!(watchlist.movie.len(), 2);
    assert_eq!(store.mirror().read().unwrap(), Some(watchlist));
}

#[test]
fn test_non_utf8_mirror_with_empty_primary() {
    let (_dir, store) = temp_store();
    std::fs::write(store.mirror().path(), [0xff, 0xfe]).unwrap();

    assert!(handlers::add_to_watchlist(&store, movie("tt001", "X"), None));
    let watchlist = handlers::get_watchlist(&store);
    assert_eq!(watchlist.movie.len(), 1);
    assert_eq!(store.mirror().read().unwrap(), Some(watchlist));
}

#[test]
fn test_both_empty_writes_nothing() {
    let (_dir, store) = temp_store();
    assert_eq!(store.shutdown().unwrap(), ReconcileAction::Nothing);
    assert!(!store.mirror().exists());
    assert!(handlers::get_watchlist(&store).is_empty());
}

#[test]
fn test_newest_policy_adopts_external_mirror_edit() {
    let (_dir, store) = temp_store();
    let store = store.with_policy(ReconcilePolicy::Newest);
    store.add_or_update(movie("tt001", "X"), None).unwrap();
    assert_eq!(store.reconcile().unwrap(), ReconcileAction::InSync);

    let mut edited = store.mirror().read().unwrap().unwrap();
    edited.movie.push(mirror_item("tt002", ContentType::Movie, "Added by hand"));
    store.mirror().write(&edited).unwrap();

    // Make sure the edit is strictly newer than the recorded sync, whatever the mtime resolution
    let mut document = store.primary().load().unwrap();
    document.mirror_synced_at = store.mirror().modified_at().map(|t| t - Duration::seconds(5));
    store.primary().save(&mut document).unwrap();

    assert_eq!(store.reconcile().unwrap(), ReconcileAction::AdoptMirror);
    assert_eq!(store.watchlist().unwrap(), edited);
}

#[test]
fn test_primary_wins_policy_discards_external_mirror_edit() {
    let (_dir, store) = temp_store();
    store.add_or_update(movie("tt001", "X"), None).unwrap();

    let mut edited = store.mirror().read().unwrap().unwrap();
    edited.movie.push(mirror_item("tt002", ContentType::Movie, "Added by hand"));
    store.mirror().write(&edited).unwrap();

    let mut document = store.primary().load().unwrap();
    document.mirror_synced_at = store.mirror().modified_at().map(|t| t - Duration::seconds(5));
    store.primary().save(&mut document).unwrap();

    let watchlist = store.watchlist().unwrap();
    assert_eq!(watchlist.movie.len(), 1);
    assert_eq!(store.mirror().read().unwrap(), Some(watchlist));
}

#[test]
fn test_settings_survive_watchlist_writes() {
    let (_dir, store) = temp_store();
    let mut settings = store.settings().unwrap();
    settings.language = "tr".to_string();
    store.save_settings(settings.clone()).unwrap();

    store.add_or_update(movie("tt001", "X"), None).unwrap();
    assert_eq!(store.settings().unwrap(), settings);
}

#[test]
fn test_from_config_honors_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let paths = PathManager::from_base(dir.path());
    let config = StoreConfig {
        reconcile_policy: ReconcilePolicy::Newest,
        primary_path: None,
        mirror_path: Some(dir.path().join("shared").join("list.json")),
    };

    let store = WatchlistStore::from_config(&paths, &config);
    assert_eq!(store.primary().path(), paths.store_file().as_path());
    assert_eq!(store.mirror().path(), dir.path().join("shared").join("list.json").as_path());
    assert_eq!(store.policy(), ReconcilePolicy::Newest);

    store.add_or_update(movie("tt001", "X"), None).unwrap();
    assert!(store.mirror().exists());
}
