//! Orchestration layer: sync pipeline, virtual category views, snapshot
//! and count caches, favorites, and the `VodCatalog` facade.

pub mod catalog;
pub mod counts;
pub mod error;
pub mod favorites;
pub mod snapshot;
pub mod sync;
pub mod views;

pub use catalog::VodCatalog;
pub use counts::CountService;
pub use error::ServiceError;
pub use favorites::JsonFavoritesStore;
pub use snapshot::{SnapshotCache, FIRST_PAGE_SIZE, PAGE_SIZE};
pub use sync::{sync_catalog, sync_movies, sync_series, SyncStats};
pub use views::{
    dedup_by_base_name, favorites_of_kind, paginate, VirtualCategory, RECENT_DEDUP_CAP,
};
