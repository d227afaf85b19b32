// Fan-out over the catalog providers, merged into one response shape

use futures::future::join_all;
use nexttowatch_config::CatalogConfig;
use nexttowatch_models::{ContentType, NormalizedDetail, SearchResponse};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::error::CatalogError;
use crate::jikan::JikanClient;
use crate::omdb::OmdbClient;
use crate::traits::CatalogClient;

/// Which part of the catalog a search or chart covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    All,
    Only(ContentType),
}

impl SearchScope {
    fn content_type(&self) -> Option<ContentType> {
        match self {
            SearchScope::All => None,
            SearchScope::Only(content_type) => Some(*content_type),
        }
    }

    fn covers(&self, client: &dyn CatalogClient) -> bool {
        match self {
            SearchScope::All => true,
            SearchScope::Only(content_type) => client.serves(*content_type),
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchScope::All => f.write_str("all"),
            SearchScope::Only(content_type) => write!(f, "{}", content_type),
        }
    }
}

impl FromStr for SearchScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(SearchScope::All);
        }
        s.parse::<ContentType>().map(SearchScope::Only)
    }
}

pub struct ContentAggregator {
    clients: Vec<Arc<dyn CatalogClient>>,
}

impl ContentAggregator {
    pub fn new(clients: Vec<Arc<dyn CatalogClient>>) -> Self {
        Self { clients }
    }

    /// Jikan for anime plus OMDb for movies and series
    pub fn from_config(config: &CatalogConfig, omdb_api_key: Option<String>) -> Result<Self, CatalogError> {
        let omdb = OmdbClient::new(config, omdb_api_key)?;
        if !omdb.has_api_key() {
            warn!("No OMDb API key configured; movie and series lookups will fail");
        }
        Ok(Self::new(vec![
            Arc::new(JikanClient::new(config)?),
            Arc::new(omdb),
        ]))
    }

    fn clients_for(&self, scope: SearchScope) -> Vec<&Arc<dyn CatalogClient>> {
        self.clients.iter().filter(|&client| scope.covers(client.as_ref())).collect()
    }

    /// Search every provider covering `scope` concurrently.
    ///
    /// Results are concatenated in provider order. Provider failures are
    /// joined into `error`; items from the providers that did answer are kept.
    pub async fn search_content(&self, query: &str, scope: SearchScope) -> SearchResponse {
        let query = query.trim();
        if query.is_empty() {
            debug!("Empty search query, returning no results");
            return SearchResponse::empty();
        }

        let clients = self.clients_for(scope);
        if clients.is_empty() {
            return SearchResponse::failed(format!("no catalog serves {} content", scope));
        }

        info!("Searching {} for '{}' across {} provider(s)", scope, query, clients.len());
        let outcomes = join_all(
            clients
                .iter()
                .map(|client| client.search(query, scope.content_type())),
        )
        .await;

        let mut response = SearchResponse::empty();
        let mut errors = Vec::new();
        for (client, outcome) in clients.iter().zip(outcomes) {
            match outcome {
                Ok(items) => {
                    debug!("{} returned {} results", client.provider_name(), items.len());
                    response.items.extend(items);
                }
                Err(e) => {
                    warn!("{} search failed: {}", client.provider_name(), e);
                    errors.push(e.to_string());
                }
            }
        }
        if !errors.is_empty() {
            response.error = Some(errors.join("; "));
        }
        response
    }

    /// Detail lookup routed to the provider serving `content_type`
    pub async fn get_content_details(&self, id: &str, content_type: ContentType) -> Result<NormalizedDetail, CatalogError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CatalogError::InvalidInput("id is required".to_string()));
        }

        let client = self
            .clients
            .iter()
            .find(|client| client.serves(content_type))
            .ok_or_else(|| CatalogError::InvalidInput(format!("no catalog serves {} content", content_type)))?;

        debug!("Fetching {} '{}' from {}", content_type, id, client.provider_name());
        client.details(id, content_type).await
    }

    /// Popular titles; only providers with a chart contribute
    pub async fn get_popular_content(&self, scope: SearchScope, limit: u32) -> SearchResponse {
        let clients = self.clients_for(scope);
        let outcomes = join_all(clients.iter().map(|client| client.popular(limit))).await;

        let mut response = SearchResponse::empty();
        let mut errors = Vec::new();
        for (client, outcome) in clients.iter().zip(outcomes) {
            match outcome {
                Ok(items) => response.items.extend(items),
                Err(e) => {
                    warn!("{} popular list failed: {}", client.provider_name(), e);
                    errors.push(e.to_string());
                }
            }
        }
        response.items.truncate(limit as usize);
        if !errors.is_empty() {
            response.error = Some(errors.join("; "));
        }
        response
    }
}
