pub mod catalog;
pub mod content_ref;
pub mod content_type;
pub mod settings;
pub mod status;
pub mod watch_history;
pub mod watchlist;

pub use catalog::{NormalizedDetail, NormalizedResult, SearchResponse};
pub use content_ref::ContentRef;
pub use content_type::ContentType;
pub use settings::Settings;
pub use status::WatchStatus;
pub use watch_history::WatchHistoryEntry;
pub use watchlist::{Watchlist, WatchlistItem};
