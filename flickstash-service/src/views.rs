//! Virtual category resolution helpers.
//!
//! Four reserved category ids resolve without a matching `categories` row:
//! the whole playlist, the favorites snapshot, a deduplicated
//! recently-added view, and a (deliberately empty) recently-watched view.
//! Everything here is pure so the resolvers can be tested without a store.

use flickstash_catalog::{normalize_base_name, Favorite, ItemKind, Page, VodMovie, VodSeries};
use std::collections::HashSet;

/// How many deduplicated entries the recently-added view keeps.
pub const RECENT_DEDUP_CAP: usize = 50;

/// The reserved category ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VirtualCategory {
    All,
    Favorites,
    RecentlyAdded,
    RecentlyWatched,
}

impl VirtualCategory {
    pub fn from_category_id(id: &str) -> Option<Self> {
        match id {
            "all" => Some(Self::All),
            "favorites" => Some(Self::Favorites),
            "recent" => Some(Self::RecentlyAdded),
            "recently_watched" => Some(Self::RecentlyWatched),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Favorites => "favorites",
            Self::RecentlyAdded => "recent",
            Self::RecentlyWatched => "recently_watched",
        }
    }
}

/// Collapse release variants of the same title, keeping the first
/// occurrence of each normalized base name, capped at [`RECENT_DEDUP_CAP`].
///
/// Input order is preserved, so feeding a newest-first scan keeps the most
/// recent variant of each title.
pub fn dedup_by_base_name<T>(items: Vec<T>, name: impl Fn(&T) -> &str) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    for item in items {
        let key = normalize_base_name(name(&item));
        if seen.insert(key) {
            kept.push(item);
            if kept.len() == RECENT_DEDUP_CAP {
                break;
            }
        }
    }
    kept
}

/// Slice a fully materialized in-memory list into a page the same shape the
/// store queries produce.
pub fn paginate<T: Clone>(items: &[T], offset: usize, limit: usize) -> Page<T> {
    let slice: Vec<T> = items.iter().skip(offset).take(limit).cloned().collect();
    let has_more = (offset + slice.len()) < items.len();
    Page {
        items: slice,
        has_more,
        total_count: items.len() as i64,
    }
}

/// Favorites belonging to one kind. Entries saved without a kind tag are
/// treated as movies: included here for `Movie`, excluded for `Series`.
pub fn favorites_of_kind(favorites: Vec<Favorite>, kind: ItemKind) -> Vec<Favorite> {
    favorites
        .into_iter()
        .filter(|f| f.effective_kind() == kind)
        .collect()
}

/// Shape a favorite snapshot as a movie row. Fields the snapshot never
/// carried stay empty; the favorites view reads only from the snapshot and
/// never joins the catalog, so it survives a catalog wipe.
pub fn favorite_as_movie(fav: &Favorite) -> VodMovie {
    VodMovie {
        playlist_id: fav.playlist_id.clone(),
        movie_id: fav.item_id.clone(),
        category_id: fav.category_id.clone().unwrap_or_default(),
        name: fav.name.clone(),
        stream_url: fav.stream_url.clone().unwrap_or_default(),
        cover_url: fav.cover_url.clone().unwrap_or_default(),
        backdrop_url: String::new(),
        rating: String::new(),
        duration: String::new(),
        genre: String::new(),
        release_date: String::new(),
        plot: String::new(),
        director: String::new(),
        cast: String::new(),
        added: fav.date_added.clone(),
        container_extension: String::new(),
    }
}

/// Shape a favorite snapshot as a series row.
pub fn favorite_as_series(fav: &Favorite) -> VodSeries {
    VodSeries {
        playlist_id: fav.playlist_id.clone(),
        series_id: fav.item_id.clone(),
        category_id: fav.category_id.clone().unwrap_or_default(),
        name: fav.name.clone(),
        cover_url: fav.cover_url.clone().unwrap_or_default(),
        backdrop_url: String::new(),
        rating: String::new(),
        genre: String::new(),
        release_date: String::new(),
        plot: String::new(),
        director: String::new(),
        cast: String::new(),
        episodes_count: 0,
        seasons_count: 0,
        added: fav.date_added.clone(),
        last_updated: String::new(),
    }
}
