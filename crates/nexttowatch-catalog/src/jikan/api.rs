use chrono::{DateTime, Datelike};
use nexttowatch_models::{ContentType, NormalizedDetail, NormalizedResult};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;
use crate::error::CatalogError;

pub(crate) const PROVIDER: &str = "Jikan";

#[derive(Debug, Deserialize)]
pub(crate) struct JikanList {
    #[serde(default)]
    pub data: Vec<JikanAnime>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JikanSingle {
    pub data: JikanAnime,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JikanAnime {
    pub mal_id: u64,
    pub title: String,
    #[serde(default)]
    pub images: Option<JikanImages>,
    #[serde(default)]
    pub aired: Option<JikanAired>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub genres: Vec<JikanNamed>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JikanImages {
    #[serde(default)]
    pub jpg: Option<JikanImage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JikanImage {
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JikanAired {
    #[serde(default)]
    pub from: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JikanNamed {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct JikanError {
    #[serde(default)]
    message: Option<String>,
}

/// Year the anime started airing; falls back to the season year
fn start_year(anime: &JikanAnime) -> Option<String> {
    anime
        .aired
        .as_ref()
        .and_then(|aired| aired.from.as_deref())
        .and_then(|from| DateTime::parse_from_rfc3339(from).ok())
        .map(|date| date.year())
        .or(anime.year)
        .map(|year| year.to_string())
}

pub(crate) fn normalize(anime: &JikanAnime) -> NormalizedResult {
    NormalizedResult {
        id: anime.mal_id.to_string(),
        title: anime.title.clone(),
        poster: None,
        image: anime
            .images
            .as_ref()
            .and_then(|images| images.jpg.as_ref())
            .and_then(|jpg| jpg.image_url.clone())
            .filter(|url| !url.is_empty()),
        content_type: ContentType::Anime,
        year: start_year(anime),
        synopsis: anime.synopsis.clone(),
        score: anime.score,
        episodes: anime.episodes,
        airing_status: anime.status.clone(),
    }
}

pub(crate) fn normalize_detail(anime: &JikanAnime) -> NormalizedDetail {
    NormalizedDetail {
        summary: normalize(anime),
        genres: anime.genres.iter().map(|genre| genre.name.clone()).collect(),
        runtime: anime.duration.clone(),
        director: None,
        actors: None,
        imdb_rating: None,
        total_seasons: None,
    }
}

async fn check(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<JikanError>(&body)
        .ok()
        .and_then(|error| error.message)
        .unwrap_or(body);
    Err(CatalogError::Status {
        provider: PROVIDER,
        status: status.as_u16(),
        message,
    })
}

fn http(source: reqwest::Error) -> CatalogError {
    CatalogError::Http {
        provider: PROVIDER,
        source,
    }
}

/// `GET /anime?q=..&page=1&limit=..&sfw=true`
pub async fn search_anime(client: &Client, base_url: &str, query: &str, limit: u32) -> Result<Vec<NormalizedResult>, CatalogError> {
    let url = format!("{}/anime", base_url.trim_end_matches('/'));
    debug!("Jikan search: {} (q={})", url, query);

    let response = client
        .get(&url)
        .query(&[
            ("q", query.to_string()),
            ("page", "1".to_string()),
            ("limit", limit.to_string()),
            ("sfw", "true".to_string()),
        ])
        .send()
        .await
        .map_err(http)?;

    let list: JikanList = check(response).await?.json().await.map_err(http)?;
    Ok(list.data.iter().map(normalize).collect())
}

/// `GET /anime/{id}`
pub async fn get_anime(client: &Client, base_url: &str, id: &str) -> Result<NormalizedDetail, CatalogError> {
    let url = format!("{}/anime/{}", base_url.trim_end_matches('/'), id);
    debug!("Jikan details: {}", url);

    let response = client.get(&url).send().await.map_err(http)?;
    let single: JikanSingle = check(response).await?.json().await.map_err(http)?;
    Ok(normalize_detail(&single.data))
}

/// `GET /top/anime?limit=..`
pub async fn top_anime(client: &Client, base_url: &str, limit: u32) -> Result<Vec<NormalizedResult>, CatalogError> {
    let url = format!("{}/top/anime", base_url.trim_end_matches('/'));
    debug!("Jikan top list: {} (limit={})", url, limit);

    let response = client
        .get(&url)
        .query(&[("limit", limit.to_string())])
        .send()
        .await
        .map_err(http)?;

    let list: JikanList = check(response).await?.json().await.map_err(http)?;
    Ok(list.data.iter().map(normalize).collect())
}
