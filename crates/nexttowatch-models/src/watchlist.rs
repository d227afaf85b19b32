use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use crate::content_type::ContentType;
use crate::status::WatchStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    pub id: String, // Provider-scoped: MAL id for anime, IMDb id for movie/series
    #[serde(alias = "type")]
    pub content_type: ContentType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default)]
    pub status: WatchStatus,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub total_episodes: u32, // 0 = unknown
    #[serde(default)]
    pub rating: f64,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched_at: Option<DateTime<Utc>>,
    /// Fields the store does not interpret (synopsis, score, ...) kept as-is
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl WatchlistItem {
    /// Poster for movies/series, cover image for anime
    pub fn artwork(&self) -> Option<&str> {
        self.poster
            .as_deref()
            .filter(|p| !p.is_empty())
            .or_else(|| self.image.as_deref().filter(|i| !i.is_empty()))
    }
}

/// The three-partition watchlist, as persisted in both representations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Watchlist {
    #[serde(default)]
    pub anime: Vec<WatchlistItem>,
    #[serde(default)]
    pub movie: Vec<WatchlistItem>,
    #[serde(default)]
    pub series: Vec<WatchlistItem>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition(&self, content_type: ContentType) -> &[WatchlistItem] {
        match content_type {
            ContentType::Anime => &self.anime,
            ContentType::Movie => &self.movie,
            ContentType::Series => &self.series,
        }
    }

    pub fn partition_mut(&mut self, content_type: ContentType) -> &mut Vec<WatchlistItem> {
        match content_type {
            ContentType::Anime => &mut self.anime,
            ContentType::Movie => &mut self.movie,
            ContentType::Series => &mut self.series,
        }
    }

    pub fn find(&self, id: &str, content_type: ContentType) -> Option<&WatchlistItem> {
        self.partition(content_type).iter().find(|item| item.id == id)
    }

    pub fn find_mut(&mut self, id: &str, content_type: ContentType) -> Option<&mut WatchlistItem> {
        self.partition_mut(content_type).iter_mut().find(|item| item.id == id)
    }

    /// True when every partition is empty
    pub fn is_empty(&self) -> bool {
        self.anime.is_empty() && self.movie.is_empty() && self.series.is_empty()
    }

    pub fn len(&self) -> usize {
        self.anime.len() + self.movie.len() + self.series.len()
    }

    /// Iterate over all items, partition by partition
    pub fn iter(&self) -> impl Iterator<Item = &WatchlistItem> {
        self.anime.iter().chain(self.movie.iter()).chain(self.series.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_keeps_unknown_fields() {
        let json = r#"{
            "id": "5114",
            "type": "anime",
            "title": "Fullmetal Alchemist: Brotherhood",
            "image": "https://cdn.example/fma.jpg",
            "status": "watching",
            "progress": 12,
            "totalEpisodes": 64,
            "addedAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-02T10:00:00Z",
            "synopsis": "Two brothers...",
            "score": 9.1
        }"#;

        let item: WatchlistItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.content_type, ContentType::Anime);
        assert_eq!(item.status, WatchStatus::Watching);
        assert_eq!(item.total_episodes, 64);
        assert_eq!(item.rating, 0.0);
        assert_eq!(item.artwork(), Some("https://cdn.example/fma.jpg"));
        assert_eq!(item.extra.get("score"), Some(&serde_json::json!(9.1)));

        let out = serde_json::to_value(&item).unwrap();
        assert_eq!(out["contentType"], "anime");
        assert_eq!(out["synopsis"], "Two brothers...");
        assert!(out.get("watchedAt").is_none());
    }

    #[test]
    fn test_missing_partitions_default_to_empty() {
        let watchlist: Watchlist = serde_json::from_str(r#"{"movie": []}"#).unwrap();
        assert!(watchlist.is_empty());
        assert_eq!(watchlist.len(), 0);
    }
}
