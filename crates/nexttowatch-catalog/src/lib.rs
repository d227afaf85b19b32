pub mod aggregator;
pub mod error;
pub mod jikan;
pub mod omdb;
pub mod traits;

pub use aggregator::{ContentAggregator, SearchScope};
pub use error::CatalogError;
pub use jikan::JikanClient;
pub use omdb::OmdbClient;
pub use traits::CatalogClient;
