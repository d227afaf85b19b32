// Pure watchlist mutations: no I/O, the caller persists the result

use chrono::{DateTime, Utc};
use nexttowatch_models::{ContentRef, ContentType, WatchHistoryEntry, WatchStatus, Watchlist, WatchlistItem};
use std::collections::BTreeMap;
use tracing::debug;
use crate::error::StoreError;

/// What `add_or_update` did to the watchlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Inserted,
    Merged,
}

/// Refresh `updated_at` without ever moving it backwards
fn touch(item: &mut WatchlistItem, now: DateTime<Utc>) {
    if now > item.updated_at {
        item.updated_at = now;
    }
}

fn mark_watched(item: &mut WatchlistItem, history: &mut Vec<WatchHistoryEntry>, now: DateTime<Utc>) {
    item.status = WatchStatus::Watched;
    item.watched_at = Some(now);
    history.push(WatchHistoryEntry {
        id: item.id.clone(),
        content_type: item.content_type,
        title: item.title.clone(),
        watched_at: now,
    });
    debug!("History entry appended for {} '{}'", item.content_type, item.id);
}

/// Set progress and derive the status from it.
///
/// Progress is capped at `total_episodes` when the total is known. Reaching
/// the total marks the item watched (one history entry per call), any other
/// positive progress means watching, zero leaves the status alone.
fn apply_progress(
    item: &mut WatchlistItem,
    history: &mut Vec<WatchHistoryEntry>,
    progress: u32,
    total_episodes: u32,
    now: DateTime<Utc>,
) {
    item.total_episodes = total_episodes;
    item.progress = if total_episodes > 0 { progress.min(total_episodes) } else { progress };

    if total_episodes > 0 && progress >= total_episodes {
        mark_watched(item, history, now);
    } else if progress > 0 {
        item.status = WatchStatus::Watching;
    }
}

/// Insert `content` into its partition, or shallow-merge it over the existing
/// entry with the same id.
///
/// `status` takes precedence over `content.status` and over the `watching`
/// derived from partial progress. Progress that reaches a known total marks
/// the item watched whatever status was asked for. Merging into an item that
/// is already watched does not append another history entry.
pub fn add_or_update(
    watchlist: &mut Watchlist,
    history: &mut Vec<WatchHistoryEntry>,
    content: ContentRef,
    status: Option<WatchStatus>,
    now: DateTime<Utc>,
) -> AddOutcome {
    let content_type = content.content_type;
    let requested_status = status.or(content.status);

    let partition = watchlist.partition_mut(content_type);
    let (index, outcome) = match partition.iter().position(|item| item.id == content.id) {
        Some(index) => (index, AddOutcome::Merged),
        None => {
            partition.push(WatchlistItem {
                id: content.id.clone(),
                content_type,
                title: content.title.clone(),
                poster: None,
                image: None,
                year: None,
                status: WatchStatus::ToWatch,
                progress: 0,
                total_episodes: 0,
                rating: 0.0,
                added_at: now,
                updated_at: now,
                watched_at: None,
                extra: BTreeMap::new(),
            });
            (partition.len() - 1, AddOutcome::Inserted)
        }
    };
    let item = &mut partition[index];

    item.title = content.title;
    if content.poster.is_some() {
        item.poster = content.poster;
    }
    if content.image.is_some() {
        item.image = content.image;
    }
    if content.year.is_some() {
        item.year = content.year;
    }
    if let Some(rating) = content.rating {
        item.rating = rating;
    }
    item.extra.extend(content.extra);

    let mut derived_status = None;
    if content.progress.is_some() || content.total_episodes.is_some() {
        let progress = content.progress.unwrap_or(item.progress);
        let total = content.total_episodes.unwrap_or(item.total_episodes);
        item.total_episodes = total;
        item.progress = if total > 0 { progress.min(total) } else { progress };

        if total > 0 && progress >= total {
            derived_status = Some(WatchStatus::Watched);
        } else if progress > 0 {
            derived_status = Some(WatchStatus::Watching);
        }
    }

    // Completed progress always means watched; otherwise an explicit status wins
    let target_status = match (derived_status, requested_status) {
        (Some(WatchStatus::Watched), _) => Some(WatchStatus::Watched),
        (_, Some(requested)) => Some(requested),
        (derived, None) => derived,
    };
    match target_status {
        Some(WatchStatus::Watched) if item.status != WatchStatus::Watched => mark_watched(item, history, now),
        Some(target) if target != WatchStatus::Watched => item.status = target,
        _ => {}
    }

    touch(item, now);
    outcome
}

/// Drop `id` from its partition. Returns whether anything was removed.
pub fn remove(watchlist: &mut Watchlist, id: &str, content_type: ContentType) -> bool {
    let partition = watchlist.partition_mut(content_type);
    let before = partition.len();
    partition.retain(|item| item.id != id);
    partition.len() != before
}

/// Set the status of an existing item. Every transition into `watched`
/// stamps `watched_at` and appends a history entry.
pub fn update_status(
    watchlist: &mut Watchlist,
    history: &mut Vec<WatchHistoryEntry>,
    id: &str,
    content_type: ContentType,
    status: WatchStatus,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let item = watchlist
        .find_mut(id, content_type)
        .ok_or_else(|| StoreError::not_found(id, content_type))?;

    if status == WatchStatus::Watched {
        mark_watched(item, history, now);
    } else {
        item.status = status;
    }
    touch(item, now);
    Ok(())
}

/// Record progress on an existing item and return the derived status
pub fn update_progress(
    watchlist: &mut Watchlist,
    history: &mut Vec<WatchHistoryEntry>,
    id: &str,
    content_type: ContentType,
    progress: u32,
    total_episodes: u32,
    now: DateTime<Utc>,
) -> Result<WatchStatus, StoreError> {
    let item = watchlist
        .find_mut(id, content_type)
        .ok_or_else(|| StoreError::not_found(id, content_type))?;

    apply_progress(item, history, progress, total_episodes, now);
    touch(item, now);
    Ok(item.status)
}
