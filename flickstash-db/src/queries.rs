//! Read queries for the catalog store.
//!
//! Paginated retrieval, substring search, recently-added scans, and the
//! aggregate count queries.

use flickstash_catalog::{ItemKind, Page, VodCategory, VodMovie, VodSeries};
use rusqlite::{params, Connection};

use crate::counters::item_table;
use crate::operations::StoreError;

/// Sort clause shared by page queries: names beginning with a Latin letter
/// sort before digits, symbols, and other scripts; case-insensitive within
/// each bucket. Catalogs mix Latin titles with language/quality-prefixed
/// and non-Latin entries, and this keeps the common case navigable first.
const LATIN_FIRST_ORDER: &str =
    "CASE WHEN name GLOB '[A-Za-z]*' THEN 0 ELSE 1 END, name COLLATE NOCASE";

/// How many newest rows a recently-added scan considers before dedup.
pub const RECENT_SCAN_LIMIT: u32 = 500;

const MOVIE_COLUMNS: &str = r#"playlist_id, movie_id, category_id, name, stream_url,
    cover_url, backdrop_url, rating, duration, genre, release_date, plot, director,
    "cast", added, container_extension"#;

const SERIES_COLUMNS: &str = r#"playlist_id, series_id, category_id, name, cover_url,
    backdrop_url, rating, genre, release_date, plot, director, "cast", episodes_count,
    seasons_count, added, last_updated"#;

// ── Categories ──────────────────────────────────────────────────────────────

/// List one kind's categories for a playlist with their denormalized counts.
///
/// Ordering puts the common language-prefixed groups first, then other
/// Latin-initial names, then everything else, NOCASE within each bucket.
pub fn categories_with_counts(
    conn: &Connection,
    playlist_id: &str,
    kind: ItemKind,
) -> Result<Vec<VodCategory>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT playlist_id, category_id, name, kind, parent_id, item_count
         FROM categories
         WHERE playlist_id = ?1 AND kind = ?2
         ORDER BY
             CASE
                 WHEN name LIKE 'FR|%' OR name LIKE 'EN|%' OR name LIKE 'ES|%' THEN 0
                 WHEN name LIKE 'DE|%' OR name LIKE 'IT|%' OR name LIKE 'PT|%' THEN 1
                 WHEN name GLOB '[A-Za-z]*' THEN 2
                 ELSE 3
             END,
             name COLLATE NOCASE",
    )?;
    let rows = stmt.query_map(params![playlist_id, kind.as_str()], row_to_category)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Paginated Pages ─────────────────────────────────────────────────────────

/// One page of movies, category-scoped or (with `None`) playlist-wide.
///
/// The count query is scoped identically to the page query, and
/// `has_more = offset + returned < total_count`. An unknown or empty
/// category yields the empty page, not an error.
pub fn movies_page(
    conn: &Connection,
    playlist_id: &str,
    category_id: Option<&str>,
    page: u32,
    page_size: u32,
) -> Result<Page<VodMovie>, StoreError> {
    movies_slice(
        conn,
        playlist_id,
        category_id,
        page as i64 * page_size as i64,
        page_size,
    )
}

/// Movie rows at an arbitrary offset, for callers whose page sizes vary
/// across a listing.
pub fn movies_slice(
    conn: &Connection,
    playlist_id: &str,
    category_id: Option<&str>,
    offset: i64,
    limit: u32,
) -> Result<Page<VodMovie>, StoreError> {
    let (total, items) = match category_id {
        Some(cat) => {
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM movies WHERE playlist_id = ?1 AND category_id = ?2",
                params![playlist_id, cat],
                |r| r.get(0),
            )?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {MOVIE_COLUMNS} FROM movies
                 WHERE playlist_id = ?1 AND category_id = ?2
                 ORDER BY {LATIN_FIRST_ORDER}
                 LIMIT ?3 OFFSET ?4"
            ))?;
            let rows = stmt
                .query_map(params![playlist_id, cat, limit, offset], row_to_movie)?
                .collect::<Result<Vec<_>, _>>()?;
            (total, rows)
        }
        None => {
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM movies WHERE playlist_id = ?1",
                params![playlist_id],
                |r| r.get(0),
            )?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {MOVIE_COLUMNS} FROM movies
                 WHERE playlist_id = ?1
                 ORDER BY {LATIN_FIRST_ORDER}
                 LIMIT ?2 OFFSET ?3"
            ))?;
            let rows = stmt
                .query_map(params![playlist_id, limit, offset], row_to_movie)?
                .collect::<Result<Vec<_>, _>>()?;
            (total, rows)
        }
    };

    let returned = items.len() as i64;
    Ok(Page {
        items,
        has_more: offset + returned < total,
        total_count: total,
    })
}

/// One page of series, category-scoped or playlist-wide.
pub fn series_page(
    conn: &Connection,
    playlist_id: &str,
    category_id: Option<&str>,
    page: u32,
    page_size: u32,
) -> Result<Page<VodSeries>, StoreError> {
    series_slice(
        conn,
        playlist_id,
        category_id,
        page as i64 * page_size as i64,
        page_size,
    )
}

/// Series rows at an arbitrary offset.
pub fn series_slice(
    conn: &Connection,
    playlist_id: &str,
    category_id: Option<&str>,
    offset: i64,
    limit: u32,
) -> Result<Page<VodSeries>, StoreError> {
    let (total, items) = match category_id {
        Some(cat) => {
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM series WHERE playlist_id = ?1 AND category_id = ?2",
                params![playlist_id, cat],
                |r| r.get(0),
            )?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {SERIES_COLUMNS} FROM series
                 WHERE playlist_id = ?1 AND category_id = ?2
                 ORDER BY {LATIN_FIRST_ORDER}
                 LIMIT ?3 OFFSET ?4"
            ))?;
            let rows = stmt
                .query_map(params![playlist_id, cat, limit, offset], row_to_series)?
                .collect::<Result<Vec<_>, _>>()?;
            (total, rows)
        }
        None => {
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM series WHERE playlist_id = ?1",
                params![playlist_id],
                |r| r.get(0),
            )?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {SERIES_COLUMNS} FROM series
                 WHERE playlist_id = ?1
                 ORDER BY {LATIN_FIRST_ORDER}
                 LIMIT ?2 OFFSET ?3"
            ))?;
            let rows = stmt
                .query_map(params![playlist_id, limit, offset], row_to_series)?
                .collect::<Result<Vec<_>, _>>()?;
            (total, rows)
        }
    };

    let returned = items.len() as i64;
    Ok(Page {
        items,
        has_more: offset + returned < total,
        total_count: total,
    })
}

// ── Search ──────────────────────────────────────────────────────────────────

/// Substring search over movie names, optionally scoped to a category.
pub fn search_movies(
    conn: &Connection,
    playlist_id: &str,
    query: &str,
    limit: u32,
    category_id: Option<&str>,
) -> Result<Vec<VodMovie>, StoreError> {
    let pattern = format!("%{query}%");
    match category_id {
        Some(cat) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MOVIE_COLUMNS} FROM movies
                 WHERE playlist_id = ?1 AND category_id = ?2 AND name LIKE ?3
                 ORDER BY name COLLATE NOCASE
                 LIMIT ?4"
            ))?;
            let rows = stmt.query_map(params![playlist_id, cat, pattern, limit], row_to_movie)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MOVIE_COLUMNS} FROM movies
                 WHERE playlist_id = ?1 AND name LIKE ?2
                 ORDER BY name COLLATE NOCASE
                 LIMIT ?3"
            ))?;
            let rows = stmt.query_map(params![playlist_id, pattern, limit], row_to_movie)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        }
    }
}

/// Substring search over series names, optionally scoped to a category.
pub fn search_series(
    conn: &Connection,
    playlist_id: &str,
    query: &str,
    limit: u32,
    category_id: Option<&str>,
) -> Result<Vec<VodSeries>, StoreError> {
    let pattern = format!("%{query}%");
    match category_id {
        Some(cat) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SERIES_COLUMNS} FROM series
                 WHERE playlist_id = ?1 AND category_id = ?2 AND name LIKE ?3
                 ORDER BY name COLLATE NOCASE
                 LIMIT ?4"
            ))?;
            let rows = stmt.query_map(params![playlist_id, cat, pattern, limit], row_to_series)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SERIES_COLUMNS} FROM series
                 WHERE playlist_id = ?1 AND name LIKE ?2
                 ORDER BY name COLLATE NOCASE
                 LIMIT ?3"
            ))?;
            let rows = stmt.query_map(params![playlist_id, pattern, limit], row_to_series)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        }
    }
}

// ── Recently Added ──────────────────────────────────────────────────────────

/// The newest movies by provider `added` timestamp, insertion time as
/// tiebreak. `added` is an epoch-seconds string, so it is compared as an
/// integer rather than lexicographically.
pub fn recent_movies(
    conn: &Connection,
    playlist_id: &str,
) -> Result<Vec<VodMovie>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MOVIE_COLUMNS} FROM movies
         WHERE playlist_id = ?1
         ORDER BY CAST(added AS INTEGER) DESC, created_at DESC
         LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![playlist_id, RECENT_SCAN_LIMIT], row_to_movie)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// The newest series by provider `added` timestamp.
pub fn recent_series(
    conn: &Connection,
    playlist_id: &str,
) -> Result<Vec<VodSeries>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SERIES_COLUMNS} FROM series
         WHERE playlist_id = ?1
         ORDER BY CAST(added AS INTEGER) DESC, created_at DESC
         LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![playlist_id, RECENT_SCAN_LIMIT], row_to_series)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Aggregates ──────────────────────────────────────────────────────────────

/// Per-category item counts from one COUNT GROUP BY.
pub fn category_counts(
    conn: &Connection,
    playlist_id: &str,
    kind: ItemKind,
) -> Result<Vec<(String, i64)>, StoreError> {
    let table = item_table(kind);
    let mut stmt = conn.prepare(&format!(
        "SELECT category_id, COUNT(*) FROM {table}
         WHERE playlist_id = ?1
         GROUP BY category_id"
    ))?;
    let rows = stmt.query_map(params![playlist_id], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Total item rows of one kind for a playlist.
pub fn item_count(
    conn: &Connection,
    playlist_id: &str,
    kind: ItemKind,
) -> Result<i64, StoreError> {
    let table = item_table(kind);
    let count = conn.query_row(
        &format!("SELECT COUNT(*) FROM {table} WHERE playlist_id = ?1"),
        params![playlist_id],
        |r| r.get(0),
    )?;
    Ok(count)
}

/// Every item row's category id, for the degraded in-process count path.
pub fn item_category_ids(
    conn: &Connection,
    playlist_id: &str,
    kind: ItemKind,
) -> Result<Vec<String>, StoreError> {
    let table = item_table(kind);
    let mut stmt = conn.prepare(&format!(
        "SELECT category_id FROM {table} WHERE playlist_id = ?1"
    ))?;
    let rows = stmt.query_map(params![playlist_id], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Row Mapping Helpers ─────────────────────────────────────────────────────

fn row_to_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<VodCategory> {
    let kind: String = row.get(3)?;
    Ok(VodCategory {
        playlist_id: row.get(0)?,
        category_id: row.get(1)?,
        name: row.get(2)?,
        kind: ItemKind::from_str_loose(&kind),
        parent_id: row.get(4)?,
        item_count: row.get(5)?,
    })
}

fn row_to_movie(row: &rusqlite::Row<'_>) -> rusqlite::Result<VodMovie> {
    Ok(VodMovie {
        playlist_id: row.get(0)?,
        movie_id: row.get(1)?,
        category_id: row.get(2)?,
        name: row.get(3)?,
        stream_url: row.get(4)?,
        cover_url: row.get(5)?,
        backdrop_url: row.get(6)?,
        rating: row.get(7)?,
        duration: row.get(8)?,
        genre: row.get(9)?,
        release_date: row.get(10)?,
        plot: row.get(11)?,
        director: row.get(12)?,
        cast: row.get(13)?,
        added: row.get(14)?,
        container_extension: row.get(15)?,
    })
}

fn row_to_series(row: &rusqlite::Row<'_>) -> rusqlite::Result<VodSeries> {
    Ok(VodSeries {
        playlist_id: row.get(0)?,
        series_id: row.get(1)?,
        category_id: row.get(2)?,
        name: row.get(3)?,
        cover_url: row.get(4)?,
        backdrop_url: row.get(5)?,
        rating: row.get(6)?,
        genre: row.get(7)?,
        release_date: row.get(8)?,
        plot: row.get(9)?,
        director: row.get(10)?,
        cast: row.get(11)?,
        episodes_count: row.get(12)?,
        seasons_count: row.get(13)?,
        added: row.get(14)?,
        last_updated: row.get(15)?,
    })
}
