pub mod error;
pub mod handlers;
pub mod mirror;
pub mod primary;
pub mod reconcile;
pub mod store;
pub mod update;

pub use error::StoreError;
pub use handlers::{dispatch, Request, Response};
pub use mirror::MirrorFile;
pub use primary::{PrimaryStore, StoreDocument};
pub use reconcile::{plan_reconcile, ReconcileAction};
pub use store::WatchlistStore;
pub use update::AddOutcome;
