//! Shared data model for the VOD catalog.
//!
//! Types here are storage-agnostic: the db crate persists them, the xtream
//! crate produces them from wire responses, and the service crate serves
//! them back out as page-shaped results.

pub mod base_name;
pub mod types;

pub use base_name::normalize_base_name;
pub use types::{Favorite, ItemKind, Page, VodCategory, VodMovie, VodSeries};
