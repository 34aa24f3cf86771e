//! Steady-state single-row operations.
//!
//! These run with the counter triggers armed, so category counts stay
//! exact without any explicit counter work here. Bulk changes go through
//! [`crate::ingest`] instead.

use flickstash_catalog::{VodMovie, VodSeries};
use rusqlite::{params, Connection};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity} with id '{id}'")]
    NotFound { entity: &'static str, id: String },
}

// ── Movie Operations ────────────────────────────────────────────────────────

/// Insert a single movie row.
pub fn add_movie(conn: &Connection, movie: &VodMovie) -> Result<(), StoreError> {
    conn.execute(
        r#"INSERT INTO movies
           (playlist_id, movie_id, category_id, name, stream_url, cover_url, backdrop_url,
            rating, duration, genre, release_date, plot, director, "cast", added,
            container_extension)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"#,
        params![
            movie.playlist_id,
            movie.movie_id,
            movie.category_id,
            movie.name,
            movie.stream_url,
            movie.cover_url,
            movie.backdrop_url,
            movie.rating,
            movie.duration,
            movie.genre,
            movie.release_date,
            movie.plot,
            movie.director,
            movie.cast,
            movie.added,
            movie.container_extension,
        ],
    )?;
    Ok(())
}

/// Delete a single movie by provider id.
pub fn remove_movie(
    conn: &Connection,
    playlist_id: &str,
    movie_id: &str,
) -> Result<(), StoreError> {
    let changed = conn.execute(
        "DELETE FROM movies WHERE playlist_id = ?1 AND movie_id = ?2",
        params![playlist_id, movie_id],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            entity: "movie",
            id: movie_id.to_string(),
        });
    }
    Ok(())
}

/// Move a movie to another category. The counter triggers shift both
/// categories' counts atomically with the update.
pub fn recategorize_movie(
    conn: &Connection,
    playlist_id: &str,
    movie_id: &str,
    new_category_id: &str,
) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE movies SET category_id = ?3, updated_at = strftime('%s', 'now')
         WHERE playlist_id = ?1 AND movie_id = ?2",
        params![playlist_id, movie_id, new_category_id],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            entity: "movie",
            id: movie_id.to_string(),
        });
    }
    Ok(())
}

// ── Series Operations ───────────────────────────────────────────────────────

/// Insert a single series row.
pub fn add_series(conn: &Connection, series: &VodSeries) -> Result<(), StoreError> {
    conn.execute(
        r#"INSERT INTO series
           (playlist_id, series_id, category_id, name, cover_url, backdrop_url, rating,
            genre, release_date, plot, director, "cast", episodes_count, seasons_count,
            added, last_updated)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"#,
        params![
            series.playlist_id,
            series.series_id,
            series.category_id,
            series.name,
            series.cover_url,
            series.backdrop_url,
            series.rating,
            series.genre,
            series.release_date,
            series.plot,
            series.director,
            series.cast,
            series.episodes_count,
            series.seasons_count,
            series.added,
            series.last_updated,
        ],
    )?;
    Ok(())
}

/// Delete a single series by provider id.
pub fn remove_series(
    conn: &Connection,
    playlist_id: &str,
    series_id: &str,
) -> Result<(), StoreError> {
    let changed = conn.execute(
        "DELETE FROM series WHERE playlist_id = ?1 AND series_id = ?2",
        params![playlist_id, series_id],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            entity: "series",
            id: series_id.to_string(),
        });
    }
    Ok(())
}

/// Move a series to another category.
pub fn recategorize_series(
    conn: &Connection,
    playlist_id: &str,
    series_id: &str,
    new_category_id: &str,
) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE series SET category_id = ?3, updated_at = strftime('%s', 'now')
         WHERE playlist_id = ?1 AND series_id = ?2",
        params![playlist_id, series_id, new_category_id],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            entity: "series",
            id: series_id.to_string(),
        });
    }
    Ok(())
}
