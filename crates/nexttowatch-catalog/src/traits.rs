use async_trait::async_trait;
use nexttowatch_models::{ContentType, NormalizedDetail, NormalizedResult};
use crate::error::CatalogError;

/// A search/detail provider, normalized to the shared result shape
#[async_trait]
pub trait CatalogClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Whether this provider holds content of the given type
    fn serves(&self, content_type: ContentType) -> bool;

    /// Free-text search. `content_type` narrows the search when the provider
    /// serves several types; `None` searches all of them.
    async fn search(
        &self,
        query: &str,
        content_type: Option<ContentType>,
    ) -> Result<Vec<NormalizedResult>, CatalogError>;

    async fn details(&self, id: &str, content_type: ContentType) -> Result<NormalizedDetail, CatalogError>;

    /// Popular titles; providers without a chart return nothing
    async fn popular(&self, _limit: u32) -> Result<Vec<NormalizedResult>, CatalogError> {
        Ok(Vec::new())
    }
}
