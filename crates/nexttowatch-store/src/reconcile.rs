// Precedence between the primary store and the mirror file

use chrono::{DateTime, Utc};
use nexttowatch_config::ReconcilePolicy;
use nexttowatch_models::Watchlist;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    /// Copy the mirror's watchlist into the primary store
    AdoptMirror,
    /// Overwrite (or create) the mirror from the primary store
    WriteMirror,
    /// Both sides already hold the same watchlist
    InSync,
    /// Neither side has any data
    Nothing,
}

/// Decide which representation is authoritative.
///
/// A mirror with content wins over an empty primary. Otherwise a primary
/// with content overwrites the mirror, whatever the mirror holds. Under
/// [`ReconcilePolicy::Newest`] a non-empty mirror whose modification time is
/// later than `mirror_synced_at` (the store's own last write) was edited
/// externally and is adopted instead.
pub fn plan_reconcile(
    primary: &Watchlist,
    mirror_synced_at: Option<DateTime<Utc>>,
    mirror: Option<&Watchlist>,
    mirror_modified_at: Option<DateTime<Utc>>,
    policy: ReconcilePolicy,
) -> ReconcileAction {
    let mirror_has_content = mirror.map(|m| !m.is_empty()).unwrap_or(false);
    let primary_has_content = !primary.is_empty();

    if mirror_has_content && !primary_has_content {
        return ReconcileAction::AdoptMirror;
    }

    if !primary_has_content {
        return ReconcileAction::Nothing;
    }

    if policy == ReconcilePolicy::Newest
        && mirror_has_content
        && edited_since_sync(mirror_synced_at, mirror_modified_at)
    {
        return ReconcileAction::AdoptMirror;
    }

    if mirror == Some(primary) {
        ReconcileAction::InSync
    } else {
        ReconcileAction::WriteMirror
    }
}

// A primary that never recorded a sync predates the policy; treat the mirror as stale
fn edited_since_sync(synced_at: Option<DateTime<Utc>>, modified_at: Option<DateTime<Utc>>) -> bool {
    match (synced_at, modified_at) {
        (Some(synced), Some(modified)) => modified > synced,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use nexttowatch_models::{ContentRef, ContentType};

    fn watchlist_with(ids: &[&str]) -> Watchlist {
        let mut watchlist = Watchlist::new();
        let mut history = Vec::new();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for id in ids {
            crate::update::add_or_update(
                &mut watchlist,
                &mut history,
                ContentRef::new(*id, ContentType::Movie, format!("Movie {}", id)),
                None,
                at,
            );
        }
        watchlist
    }

    fn at(minutes: i64) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes))
    }

    #[test]
    fn test_empty_primary_adopts_mirror() {
        let primary = Watchlist::new();
        let mirror = watchlist_with(&["tt1"]);
        for policy in [ReconcilePolicy::PrimaryWins, ReconcilePolicy::Newest] {
            assert_eq!(
                plan_reconcile(&primary, None, Some(&mirror), at(0), policy),
                ReconcileAction::AdoptMirror
            );
        }
    }

    #[test]
    fn test_primary_with_data_overwrites_mirror() {
        let primary = watchlist_with(&["tt1"]);
        let mirror = watchlist_with(&["tt2", "tt3"]);

        assert_eq!(
            plan_reconcile(&primary, at(0), Some(&mirror), at(10), ReconcilePolicy::PrimaryWins),
            ReconcileAction::WriteMirror
        );
        assert_eq!(
            plan_reconcile(&primary, None, None, None, ReconcilePolicy::PrimaryWins),
            ReconcileAction::WriteMirror
        );
        assert_eq!(
            plan_reconcile(&primary, None, Some(&Watchlist::new()), at(0), ReconcilePolicy::PrimaryWins),
            ReconcileAction::WriteMirror
        );
    }

    #[test]
    fn test_equal_sides_are_in_sync() {
        let primary = watchlist_with(&["tt1"]);
        let mirror = primary.clone();
        assert_eq!(
            plan_reconcile(&primary, at(0), Some(&mirror), at(0), ReconcilePolicy::PrimaryWins),
            ReconcileAction::InSync
        );
    }

    #[test]
    fn test_both_empty_does_nothing() {
        let empty = Watchlist::new();
        assert_eq!(
            plan_reconcile(&empty, None, None, None, ReconcilePolicy::PrimaryWins),
            ReconcileAction::Nothing
        );
        assert_eq!(
            plan_reconcile(&empty, None, Some(&empty), at(0), ReconcilePolicy::Newest),
            ReconcileAction::Nothing
        );
    }

    #[test]
    fn test_newest_adopts_externally_edited_mirror() {
        let primary = watchlist_with(&["tt1"]);
        let mirror = watchlist_with(&["tt1", "tt2"]);

        assert_eq!(
            plan_reconcile(&primary, at(0), Some(&mirror), at(5), ReconcilePolicy::Newest),
            ReconcileAction::AdoptMirror
        );
        // Untouched since the store's own write
        assert_eq!(
            plan_reconcile(&primary, at(5), Some(&mirror), at(5), ReconcilePolicy::Newest),
            ReconcileAction::WriteMirror
        );
        // No sync stamp recorded
        assert_eq!(
            plan_reconcile(&primary, None, Some(&mirror), at(5), ReconcilePolicy::Newest),
            ReconcileAction::WriteMirror
        );
    }

    #[test]
    fn test_newest_ignores_emptied_mirror() {
        let primary = watchlist_with(&["tt1"]);
        assert_eq!(
            plan_reconcile(&primary, at(0), Some(&Watchlist::new()), at(5), ReconcilePolicy::Newest),
            ReconcileAction::WriteMirror
        );
    }
}
