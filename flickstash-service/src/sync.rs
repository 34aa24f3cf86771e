//! Fetch-then-ingest sync pipeline.
//!
//! The remote API delivers each listing in one unpaginated response, so a
//! sync is: fetch categories, fetch the full item list, normalize the wire
//! types, then run the replace-all ingestion. Both fetches complete before
//! any delete touches the store; a fetch error leaves the previous snapshot
//! fully intact.

use flickstash_catalog::{ItemKind, VodCategory, VodMovie, VodSeries};
use flickstash_db::{replace_categories, replace_movies, replace_series};
use flickstash_xtream::XtreamClient;
use log::info;
use rusqlite::Connection;

use crate::error::ServiceError;

/// Row counts from one sync run.
#[derive(Debug, Default, Clone)]
pub struct SyncStats {
    pub categories: usize,
    pub items: u64,
}

impl SyncStats {
    fn merged(self, other: SyncStats) -> SyncStats {
        SyncStats {
            categories: self.categories + other.categories,
            items: self.items + other.items,
        }
    }
}

/// Download and ingest the movie catalog for one playlist.
pub async fn sync_movies(
    client: &XtreamClient,
    conn: &Connection,
    playlist_id: &str,
) -> Result<SyncStats, ServiceError> {
    let wire_categories = client.vod_categories().await?;
    let wire_movies = client.vod_streams().await?;

    let creds = client.credentials();
    let categories: Vec<VodCategory> = wire_categories
        .into_iter()
        .map(|c| c.into_category(playlist_id, ItemKind::Movie))
        .collect();
    let movies: Vec<VodMovie> = wire_movies
        .into_iter()
        .map(|m| m.into_movie(playlist_id, &creds.base_url, &creds.username, &creds.password))
        .collect();

    let category_count = replace_categories(conn, playlist_id, ItemKind::Movie, &categories)?;
    let stats = replace_movies(conn, playlist_id, &movies).await?;

    Ok(SyncStats {
        categories: category_count,
        items: stats.rows_inserted,
    })
}

/// Download and ingest the series catalog for one playlist.
pub async fn sync_series(
    client: &XtreamClient,
    conn: &Connection,
    playlist_id: &str,
) -> Result<SyncStats, ServiceError> {
    let wire_categories = client.series_categories().await?;
    let wire_series = client.series().await?;

    let categories: Vec<VodCategory> = wire_categories
        .into_iter()
        .map(|c| c.into_category(playlist_id, ItemKind::Series))
        .collect();
    let series: Vec<VodSeries> = wire_series
        .into_iter()
        .map(|s| s.into_series(playlist_id))
        .collect();

    let category_count = replace_categories(conn, playlist_id, ItemKind::Series, &categories)?;
    let stats = replace_series(conn, playlist_id, &series).await?;

    Ok(SyncStats {
        categories: category_count,
        items: stats.rows_inserted,
    })
}

/// Sync both partitions of one playlist, movies first.
pub async fn sync_catalog(
    client: &XtreamClient,
    conn: &Connection,
    playlist_id: &str,
) -> Result<SyncStats, ServiceError> {
    let movies = sync_movies(client, conn, playlist_id).await?;
    let series = sync_series(client, conn, playlist_id).await?;
    let stats = movies.merged(series);
    info!(
        "synced playlist {}: {} categories, {} items",
        playlist_id, stats.categories, stats.items
    );
    Ok(stats)
}
