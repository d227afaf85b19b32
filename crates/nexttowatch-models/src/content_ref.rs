use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use crate::catalog::{NormalizedDetail, NormalizedResult};
use crate::content_type::ContentType;
use crate::status::WatchStatus;

/// Payload for adding or updating a watchlist entry.
///
/// Every `Some` field overrides the stored value on merge; `None` leaves it
/// alone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentRef {
    pub id: String,
    #[serde(alias = "type")]
    pub content_type: ContentType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WatchStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ContentRef {
    pub fn new(id: impl Into<String>, content_type: ContentType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content_type,
            title: title.into(),
            poster: None,
            image: None,
            year: None,
            status: None,
            progress: None,
            total_episodes: None,
            rating: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_status(mut self, status: WatchStatus) -> Self {
        self.status = Some(status);
        self
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

impl From<&NormalizedResult> for ContentRef {
    fn from(result: &NormalizedResult) -> Self {
        let mut content = ContentRef::new(result.id.clone(), result.content_type, result.title.clone());
        content.poster = non_empty(&result.poster);
        content.image = non_empty(&result.image);
        content.year = non_empty(&result.year);
        content.total_episodes = result.episodes.filter(|e| *e > 0);
        if let Some(ref synopsis) = result.synopsis {
            content.extra.insert("synopsis".to_string(), Value::String(synopsis.clone()));
        }
        content
    }
}

impl From<&NormalizedDetail> for ContentRef {
    fn from(detail: &NormalizedDetail) -> Self {
        let mut content = ContentRef::from(&detail.summary);
        if !detail.genres.is_empty() {
            content.extra.insert("genres".to_string(), serde_json::json!(detail.genres));
        }
        content
    }
}
