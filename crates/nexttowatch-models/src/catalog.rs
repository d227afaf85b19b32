use serde::{Deserialize, Serialize};
use crate::content_type::ContentType;

/// One search hit, normalized across catalog providers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>, // OMDb
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>, // Jikan
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episodes: Option<u32>,
    /// Provider airing status ("Finished Airing", ...), unrelated to WatchStatus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airing_status: Option<String>,
}

/// Detail view of a single title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDetail {
    #[serde(flatten)]
    pub summary: NormalizedResult,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_seasons: Option<String>,
}

/// Search outcome handed to the presentation layer.
///
/// Catalog failures travel in `error` next to whatever items could still be
/// collected; they are never raised.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub items: Vec<NormalizedResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            error: Some(error.into()),
        }
    }
}
