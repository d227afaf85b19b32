use nexttowatch_models::{ContentType, NormalizedDetail, NormalizedResult};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};
use crate::error::CatalogError;

pub(crate) const PROVIDER: &str = "OMDb";

#[derive(Debug, Deserialize)]
pub(crate) struct OmdbSearch {
    #[serde(rename = "Search", default)]
    pub search: Vec<OmdbSummary>,
    #[serde(rename = "Response")]
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OmdbSummary {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Type", default)]
    pub item_type: Option<String>,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OmdbTitle {
    #[serde(flatten)]
    pub summary: OmdbSummary,
    #[serde(rename = "Plot", default)]
    pub plot: Option<String>,
    #[serde(rename = "Runtime", default)]
    pub runtime: Option<String>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    #[serde(rename = "Director", default)]
    pub director: Option<String>,
    #[serde(rename = "Actors", default)]
    pub actors: Option<String>,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<String>,
    #[serde(rename = "totalSeasons", default)]
    pub total_seasons: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbEnvelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// OMDb fills unknown fields with the literal "N/A"
fn known(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "N/A")
        .map(str::to_string)
}

pub(crate) fn content_type_of(item_type: Option<&str>) -> ContentType {
    match item_type {
        Some("movie") => ContentType::Movie,
        _ => ContentType::Series,
    }
}

pub(crate) fn normalize(summary: &OmdbSummary) -> NormalizedResult {
    NormalizedResult {
        id: summary.imdb_id.clone(),
        title: summary.title.clone(),
        poster: known(&summary.poster),
        image: None,
        content_type: content_type_of(summary.item_type.as_deref()),
        year: known(&summary.year),
        synopsis: None,
        score: None,
        episodes: None,
        airing_status: None,
    }
}

pub(crate) fn normalize_detail(title: &OmdbTitle) -> NormalizedDetail {
    let mut summary = normalize(&title.summary);
    summary.synopsis = known(&title.plot);
    summary.score = known(&title.imdb_rating).and_then(|rating| rating.parse().ok());

    NormalizedDetail {
        summary,
        genres: known(&title.genre)
            .map(|genres| genres.split(',').map(|g| g.trim().to_string()).filter(|g| !g.is_empty()).collect())
            .unwrap_or_default(),
        runtime: known(&title.runtime),
        director: known(&title.director),
        actors: known(&title.actors),
        imdb_rating: known(&title.imdb_rating),
        total_seasons: known(&title.total_seasons),
    }
}

fn http(source: reqwest::Error) -> CatalogError {
    CatalogError::Http {
        provider: PROVIDER,
        source,
    }
}

/// OMDb answers HTTP 200 with `"Response": "False"` for lookups that fail
async fn read_body(response: Response) -> Result<String, CatalogError> {
    let status = response.status();
    let body = response.text().await.map_err(http)?;
    if !status.is_success() {
        return Err(CatalogError::Status {
            provider: PROVIDER,
            status: status.as_u16(),
            message: body,
        });
    }

    if let Ok(envelope) = serde_json::from_str::<OmdbEnvelope>(&body) {
        if envelope.response == "False" {
            let message = envelope.error.unwrap_or_else(|| "request failed".to_string());
            warn!("OMDb error: {}", message);
            return Err(CatalogError::Provider {
                provider: PROVIDER,
                message,
            });
        }
    }
    Ok(body)
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::Provider {
        provider: PROVIDER,
        message: format!("unexpected response: {}", e),
    })
}

/// `GET ?s=..&type=..&page=1`
pub async fn search(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
    content_type: Option<ContentType>,
) -> Result<Vec<NormalizedResult>, CatalogError> {
    let mut params = vec![
        ("apikey", api_key.to_string()),
        ("s", query.to_string()),
        ("page", "1".to_string()),
    ];
    if let Some(content_type) = content_type {
        params.push(("type", content_type.as_str().to_string()));
    }
    debug!("OMDb search: q={} type={:?}", query, content_type);

    let response = client.get(base_url).query(&params).send().await.map_err(http)?;
    let body = read_body(response).await?;
    let results: OmdbSearch = decode(&body)?;
    debug!("OMDb search returned {} results ({})", results.search.len(), results.response);
    Ok(results.search.iter().map(normalize).collect())
}

/// `GET ?i=..&plot=full`
pub async fn get_title(client: &Client, base_url: &str, api_key: &str, imdb_id: &str) -> Result<NormalizedDetail, CatalogError> {
    debug!("OMDb details: {}", imdb_id);
    let response = client
        .get(base_url)
        .query(&[("apikey", api_key), ("i", imdb_id), ("plot", "full")])
        .send()
        .await
        .map_err(http)?;

    let body = read_body(response).await?;
    let title: OmdbTitle = decode(&body)?;
    Ok(normalize_detail(&title))
}
