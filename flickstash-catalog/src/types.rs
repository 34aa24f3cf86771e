//! Data model types for the VOD catalog.
//!
//! These mirror the persisted schema: categories, movies, and series scoped
//! by playlist id, plus the favorite snapshot kept outside the catalog store.

use serde::{Deserialize, Serialize};

// ── Item Kind ───────────────────────────────────────────────────────────────

/// Which partition of the catalog a row belongs to.
///
/// Movie and series rows live in separate tables, but categories share one
/// table distinguished by this tag. Every delete/replace on categories must
/// filter by both playlist id and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Movie,
    Series,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }

    /// Parse a kind tag, defaulting unknown values to `Movie`.
    pub fn from_str_loose(s: &str) -> Self {
        if s.eq_ignore_ascii_case("series") {
            Self::Series
        } else {
            Self::Movie
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Category ────────────────────────────────────────────────────────────────

/// A provider category with its denormalized item count.
///
/// Unique per (playlist_id, category_id, kind). `item_count` equals the
/// number of item rows in this category after any completed ingestion or
/// steady-state mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VodCategory {
    pub playlist_id: String,
    pub category_id: String,
    pub name: String,
    pub kind: ItemKind,
    pub parent_id: i64,
    pub item_count: i64,
}

// ── Movie ───────────────────────────────────────────────────────────────────

/// A movie row. Provider fields are stored as strings as-delivered;
/// `added` is an epoch-seconds string from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VodMovie {
    pub playlist_id: String,
    pub movie_id: String,
    pub category_id: String,
    pub name: String,
    pub stream_url: String,
    pub cover_url: String,
    pub backdrop_url: String,
    pub rating: String,
    pub duration: String,
    pub genre: String,
    pub release_date: String,
    pub plot: String,
    pub director: String,
    pub cast: String,
    pub added: String,
    pub container_extension: String,
}

// ── Series ──────────────────────────────────────────────────────────────────

/// A series row. Same metadata shape as a movie minus the stream URL,
/// plus episode/season counts. Episodes themselves are not cataloged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VodSeries {
    pub playlist_id: String,
    pub series_id: String,
    pub category_id: String,
    pub name: String,
    pub cover_url: String,
    pub backdrop_url: String,
    pub rating: String,
    pub genre: String,
    pub release_date: String,
    pub plot: String,
    pub director: String,
    pub cast: String,
    pub episodes_count: i64,
    pub seasons_count: i64,
    pub added: String,
    pub last_updated: String,
}

// ── Favorite ────────────────────────────────────────────────────────────────

/// A favorited item, keyed by (profile_id, playlist_id, item_id).
///
/// Carries a denormalized snapshot of the item so it stays renderable after
/// the catalog for its playlist has been wiped and re-ingested. A missing
/// `kind` tag is treated as `Movie` throughout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: String,
    pub profile_id: String,
    pub playlist_id: String,
    pub item_id: String,
    #[serde(default)]
    pub kind: Option<ItemKind>,
    pub name: String,
    #[serde(default)]
    pub stream_url: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    pub date_added: String,
}

impl Favorite {
    /// Effective kind for filtering: untagged favorites count as movies.
    pub fn effective_kind(&self) -> ItemKind {
        self.kind.unwrap_or(ItemKind::Movie)
    }
}

// ── Page ────────────────────────────────────────────────────────────────────

/// One page of a paginated result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
    pub total_count: i64,
}

impl<T> Page<T> {
    /// The empty page: the answer for unknown categories and for
    /// not-implemented virtual categories.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            has_more: false,
            total_count: 0,
        }
    }
}
