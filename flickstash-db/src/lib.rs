//! SQLite persistence layer for the VOD catalog.
//!
//! Provides schema creation, replace-all bulk ingestion with suspended
//! counter/index maintenance, steady-state single-row operations, and the
//! paginated/search/aggregate query APIs, backed by SQLite (via rusqlite
//! with the bundled feature).

pub mod counters;
pub mod ingest;
pub mod operations;
pub mod queries;
pub mod schema;

pub use counters::{CounterCycle, CounterError};
pub use ingest::{
    replace_categories, replace_movies, replace_series, IngestError, IngestStats,
};
pub use operations::{
    add_movie, add_series, recategorize_movie, recategorize_series, remove_movie,
    remove_series, StoreError,
};
pub use queries::{
    categories_with_counts, category_counts, item_category_ids, item_count, movies_page,
    movies_slice, recent_movies, recent_series, search_movies, search_series, series_page,
    series_slice, RECENT_SCAN_LIMIT,
};
pub use schema::{open_database, open_memory, SchemaError};
