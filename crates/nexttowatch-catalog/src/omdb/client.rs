use async_trait::async_trait;
use nexttowatch_config::CatalogConfig;
use nexttowatch_models::{ContentType, NormalizedDetail, NormalizedResult};
use reqwest::Client;
use std::time::Duration;
use crate::error::CatalogError;
use crate::omdb::api;
use crate::traits::CatalogClient;

/// Movie and series catalog backed by OMDb; every request needs an API key
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OmdbClient {
    pub fn new(config: &CatalogConfig, api_key: Option<String>) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|source| CatalogError::Http {
                provider: api::PROVIDER,
                source,
            })?;

        Ok(Self {
            client,
            base_url: config.omdb_base_url.clone(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, CatalogError> {
        self.api_key
            .as_deref()
            .ok_or(CatalogError::MissingApiKey { provider: api::PROVIDER })
    }
}

#[async_trait]
impl CatalogClient for OmdbClient {
    fn provider_name(&self) -> &'static str {
        api::PROVIDER
    }

    fn serves(&self, content_type: ContentType) -> bool {
        matches!(content_type, ContentType::Movie | ContentType::Series)
    }

    async fn search(
        &self,
        query: &str,
        content_type: Option<ContentType>,
    ) -> Result<Vec<NormalizedResult>, CatalogError> {
        if let Some(content_type) = content_type.filter(|ct| !self.serves(*ct)) {
            return Err(CatalogError::Unsupported {
                provider: api::PROVIDER,
                content_type,
            });
        }
        let api_key = self.api_key()?;
        api::search(&self.client, &self.base_url, api_key, query, content_type).await
    }

    async fn details(&self, id: &str, content_type: ContentType) -> Result<NormalizedDetail, CatalogError> {
        if !self.serves(content_type) {
            return Err(CatalogError::Unsupported {
                provider: api::PROVIDER,
                content_type,
            });
        }
        let api_key = self.api_key()?;
        api::get_title(&self.client, &self.base_url, api_key, id).await
    }
}
