use nexttowatch_models::ContentType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request to {provider} failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} responded with HTTP {status}: {message}")]
    Status {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("{provider}: {message}")]
    Provider { provider: &'static str, message: String },

    #[error("{provider} does not serve {content_type} content")]
    Unsupported {
        provider: &'static str,
        content_type: ContentType,
    },

    #[error("{provider} API key is not configured")]
    MissingApiKey { provider: &'static str },

    #[error("{0}")]
    InvalidInput(String),
}
