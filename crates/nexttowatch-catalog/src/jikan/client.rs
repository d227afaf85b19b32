use async_trait::async_trait;
use nexttowatch_config::CatalogConfig;
use nexttowatch_models::{ContentType, NormalizedDetail, NormalizedResult};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;
use crate::error::CatalogError;
use crate::jikan::api;
use crate::traits::CatalogClient;

/// Anime catalog backed by the public Jikan (MyAnimeList) API.
///
/// Jikan rate-limits aggressively, so consecutive requests through one client
/// are spaced by at least `request_delay`.
pub struct JikanClient {
    client: Client,
    base_url: String,
    page_limit: u32,
    request_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl JikanClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|source| CatalogError::Http {
                provider: api::PROVIDER,
                source,
            })?;

        Ok(Self {
            client,
            base_url: config.jikan_base_url.clone(),
            page_limit: config.anime_page_limit,
            request_delay: Duration::from_millis(config.request_delay_ms),
            last_request: Mutex::new(None),
        })
    }

    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.request_delay {
                let wait = self.request_delay - elapsed;
                debug!("Jikan throttle: waiting {:?}", wait);
                sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn unsupported(content_type: ContentType) -> CatalogError {
        CatalogError::Unsupported {
            provider: api::PROVIDER,
            content_type,
        }
    }
}

#[async_trait]
impl CatalogClient for JikanClient {
    fn provider_name(&self) -> &'static str {
        api::PROVIDER
    }

    fn serves(&self, content_type: ContentType) -> bool {
        content_type == ContentType::Anime
    }

    async fn search(
        &self,
        query: &str,
        content_type: Option<ContentType>,
    ) -> Result<Vec<NormalizedResult>, CatalogError> {
        if let Some(content_type) = content_type.filter(|ct| !self.serves(*ct)) {
            return Err(Self::unsupported(content_type));
        }
        self.throttle().await;
        api::search_anime(&self.client, &self.base_url, query, self.page_limit).await
    }

    async fn details(&self, id: &str, content_type: ContentType) -> Result<NormalizedDetail, CatalogError> {
        if !self.serves(content_type) {
            return Err(Self::unsupported(content_type));
        }
        self.throttle().await;
        api::get_anime(&self.client, &self.base_url, id).await
    }

    async fn popular(&self, limit: u32) -> Result<Vec<NormalizedResult>, CatalogError> {
        self.throttle().await;
        api::top_anime(&self.client, &self.base_url, limit).await
    }
}
