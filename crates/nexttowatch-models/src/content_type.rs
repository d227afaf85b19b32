use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Partition key of the watchlist.
///
/// Catalogs report TV content as either `series` or `show`; both land in
/// [`ContentType::Series`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Anime,
    Movie,
    #[serde(alias = "show")]
    Series,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [ContentType::Anime, ContentType::Movie, ContentType::Series];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Anime => "anime",
            ContentType::Movie => "movie",
            ContentType::Series => "series",
        }
    }

    /// Parse a provider-supplied type name, normalizing `show` to `series`
    pub fn normalize(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "anime" => Some(ContentType::Anime),
            "movie" => Some(ContentType::Movie),
            "series" | "show" => Some(ContentType::Series),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s).ok_or_else(|| format!("Invalid content type: {}. Use 'anime', 'movie' or 'series'", s))
    }
}
