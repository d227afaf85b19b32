use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::content_type::ContentType;

/// Append-only record written each time an item enters `watched`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub title: String,
    pub watched_at: DateTime<Utc>,
}
