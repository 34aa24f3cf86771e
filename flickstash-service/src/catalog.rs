//! The consumer-facing catalog facade.
//!
//! `VodCatalog` owns the SQLite connection, the snapshot and count caches,
//! the favorites file, and optionally a provider client. Consumers open
//! one per profile and drop it to close; there is no global instance.

use std::path::{Path, PathBuf};

use flickstash_catalog::{Favorite, ItemKind, Page, VodCategory, VodMovie, VodSeries};
use flickstash_db::{
    categories_with_counts, movies_slice, open_database, open_memory, recent_movies,
    recent_series, search_movies, search_series, series_slice,
};
use flickstash_xtream::XtreamClient;
use rusqlite::Connection;
use std::collections::HashMap;

use crate::counts::CountService;
use crate::error::ServiceError;
use crate::favorites::JsonFavoritesStore;
use crate::snapshot::{page_limit, page_offset, SnapshotCache, FIRST_PAGE_SIZE};
use crate::sync::{sync_catalog, SyncStats};
use crate::views::{
    dedup_by_base_name, favorite_as_movie, favorite_as_series, favorites_of_kind, paginate,
    VirtualCategory,
};

pub struct VodCatalog {
    conn: Connection,
    client: Option<XtreamClient>,
    profile_id: String,
    movie_snapshots: SnapshotCache<VodMovie>,
    series_snapshots: SnapshotCache<VodSeries>,
    counts: CountService,
    favorites: JsonFavoritesStore,
}

impl VodCatalog {
    /// Open (creating if needed) a catalog database and favorites file.
    pub fn open(
        db_path: &Path,
        favorites_path: PathBuf,
        profile_id: &str,
    ) -> Result<Self, ServiceError> {
        let conn = open_database(db_path)?;
        Ok(Self::from_connection(conn, favorites_path, profile_id))
    }

    /// An in-memory catalog, used by tests and dry runs.
    pub fn open_in_memory(
        favorites_path: PathBuf,
        profile_id: &str,
    ) -> Result<Self, ServiceError> {
        let conn = open_memory()?;
        Ok(Self::from_connection(conn, favorites_path, profile_id))
    }

    fn from_connection(conn: Connection, favorites_path: PathBuf, profile_id: &str) -> Self {
        Self {
            conn,
            client: None,
            profile_id: profile_id.to_string(),
            movie_snapshots: SnapshotCache::new(),
            series_snapshots: SnapshotCache::new(),
            counts: CountService::new(),
            favorites: JsonFavoritesStore::new(favorites_path),
        }
    }

    /// Attach a provider client, enabling `sync` and lazy count ingestion.
    pub fn with_client(mut self, client: XtreamClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    // ── Browse ──────────────────────────────────────────────────────────────

    /// The category list for one (playlist, kind), served from the snapshot
    /// cache when warm.
    pub fn get_categories(
        &mut self,
        playlist_id: &str,
        kind: ItemKind,
    ) -> Result<Vec<VodCategory>, ServiceError> {
        match kind {
            ItemKind::Movie => {
                let conn = &self.conn;
                let snap = self.movie_snapshots.get_or_load(playlist_id, || {
                    load_movie_snapshot(conn, playlist_id)
                })?;
                Ok(snap.categories.clone())
            }
            ItemKind::Series => {
                let conn = &self.conn;
                let snap = self.series_snapshots.get_or_load(playlist_id, || {
                    load_series_snapshot(conn, playlist_id)
                })?;
                Ok(snap.categories.clone())
            }
        }
    }

    /// One page of movies. `category_id` may be a provider category, one of
    /// the reserved virtual ids, or `None` for the whole playlist.
    pub fn get_movie_page(
        &mut self,
        playlist_id: &str,
        category_id: Option<&str>,
        page: u32,
    ) -> Result<Page<VodMovie>, ServiceError> {
        let virtual_cat = category_id.and_then(VirtualCategory::from_category_id);
        match virtual_cat {
            Some(VirtualCategory::All) | None if page == 0 && category_id_is_unscoped(category_id) => {
                let conn = &self.conn;
                let snap = self.movie_snapshots.get_or_load(playlist_id, || {
                    load_movie_snapshot(conn, playlist_id)
                })?;
                Ok(snap.first_page.clone())
            }
            Some(VirtualCategory::All) => Ok(movies_slice(
                &self.conn,
                playlist_id,
                None,
                page_offset(page),
                page_limit(page),
            )?),
            Some(VirtualCategory::Favorites) => {
                let favorites = self.favorites.favorites_for(&self.profile_id, playlist_id)?;
                let movies: Vec<VodMovie> = favorites_of_kind(favorites, ItemKind::Movie)
                    .iter()
                    .map(favorite_as_movie)
                    .collect();
                Ok(paginate(
                    &movies,
                    page_offset(page) as usize,
                    page_limit(page) as usize,
                ))
            }
            Some(VirtualCategory::RecentlyAdded) => {
                let scanned = recent_movies(&self.conn, playlist_id)?;
                let deduped = dedup_by_base_name(scanned, |m| &m.name);
                Ok(paginate(
                    &deduped,
                    page_offset(page) as usize,
                    page_limit(page) as usize,
                ))
            }
            Some(VirtualCategory::RecentlyWatched) => Ok(Page::empty()),
            None => Ok(movies_slice(
                &self.conn,
                playlist_id,
                category_id,
                page_offset(page),
                page_limit(page),
            )?),
        }
    }

    /// One page of series. Same contract as [`Self::get_movie_page`].
    pub fn get_series_page(
        &mut self,
        playlist_id: &str,
        category_id: Option<&str>,
        page: u32,
    ) -> Result<Page<VodSeries>, ServiceError> {
        let virtual_cat = category_id.and_then(VirtualCategory::from_category_id);
        match virtual_cat {
            Some(VirtualCategory::All) | None if page == 0 && category_id_is_unscoped(category_id) => {
                let conn = &self.conn;
                let snap = self.series_snapshots.get_or_load(playlist_id, || {
                    load_series_snapshot(conn, playlist_id)
                })?;
                Ok(snap.first_page.clone())
            }
            Some(VirtualCategory::All) => Ok(series_slice(
                &self.conn,
                playlist_id,
                None,
                page_offset(page),
                page_limit(page),
            )?),
            Some(VirtualCategory::Favorites) => {
                let favorites = self.favorites.favorites_for(&self.profile_id, playlist_id)?;
                let series: Vec<VodSeries> = favorites_of_kind(favorites, ItemKind::Series)
                    .iter()
                    .map(favorite_as_series)
                    .collect();
                Ok(paginate(
                    &series,
                    page_offset(page) as usize,
                    page_limit(page) as usize,
                ))
            }
            Some(VirtualCategory::RecentlyAdded) => {
                let scanned = recent_series(&self.conn, playlist_id)?;
                let deduped = dedup_by_base_name(scanned, |s| &s.name);
                Ok(paginate(
                    &deduped,
                    page_offset(page) as usize,
                    page_limit(page) as usize,
                ))
            }
            Some(VirtualCategory::RecentlyWatched) => Ok(Page::empty()),
            None => Ok(series_slice(
                &self.conn,
                playlist_id,
                category_id,
                page_offset(page),
                page_limit(page),
            )?),
        }
    }

    /// Substring search over movie names.
    pub fn search_movies(
        &self,
        playlist_id: &str,
        query: &str,
        limit: u32,
        category_id: Option<&str>,
    ) -> Result<Vec<VodMovie>, ServiceError> {
        Ok(search_movies(&self.conn, playlist_id, query, limit, category_id)?)
    }

    /// Substring search over series names.
    pub fn search_series(
        &self,
        playlist_id: &str,
        query: &str,
        limit: u32,
        category_id: Option<&str>,
    ) -> Result<Vec<VodSeries>, ServiceError> {
        Ok(search_series(&self.conn, playlist_id, query, limit, category_id)?)
    }

    /// Per-category item counts via the memoized hybrid count service.
    pub async fn category_counts(
        &mut self,
        playlist_id: &str,
        kind: ItemKind,
    ) -> Result<HashMap<String, i64>, ServiceError> {
        self.counts
            .category_counts(&self.conn, self.client.as_ref(), playlist_id, kind)
            .await
    }

    // ── Sync ────────────────────────────────────────────────────────────────

    /// Download and ingest both partitions, then drop every cache for the
    /// playlist.
    pub async fn sync(&mut self, playlist_id: &str) -> Result<SyncStats, ServiceError> {
        let client = self.client.as_ref().ok_or(ServiceError::NoClient)?;
        let stats = sync_catalog(client, &self.conn, playlist_id).await?;
        self.refresh(playlist_id);
        Ok(stats)
    }

    /// Invalidate the snapshot and count caches for one playlist.
    pub fn refresh(&mut self, playlist_id: &str) {
        self.movie_snapshots.invalidate(playlist_id);
        self.series_snapshots.invalidate(playlist_id);
        self.counts.invalidate(playlist_id);
    }

    // ── Favorites ───────────────────────────────────────────────────────────

    pub fn favorites(&self, playlist_id: &str) -> Result<Vec<Favorite>, ServiceError> {
        self.favorites.favorites_for(&self.profile_id, playlist_id)
    }

    pub fn add_favorite(&self, favorite: Favorite) -> Result<(), ServiceError> {
        self.favorites.add(favorite)
    }

    pub fn remove_favorite(&self, playlist_id: &str, item_id: &str) -> Result<bool, ServiceError> {
        self.favorites.remove(&self.profile_id, playlist_id, item_id)
    }

    /// Returns whether the item is a favorite afterwards.
    pub fn toggle_favorite(&self, favorite: Favorite) -> Result<bool, ServiceError> {
        self.favorites.toggle(favorite)
    }

    pub fn is_favorite(&self, playlist_id: &str, item_id: &str) -> Result<bool, ServiceError> {
        self.favorites.is_favorite(&self.profile_id, playlist_id, item_id)
    }
}

fn category_id_is_unscoped(category_id: Option<&str>) -> bool {
    matches!(category_id, None | Some("all"))
}

fn load_movie_snapshot(
    conn: &Connection,
    playlist_id: &str,
) -> Result<(Vec<VodCategory>, Page<VodMovie>), ServiceError> {
    let categories = categories_with_counts(conn, playlist_id, ItemKind::Movie)?;
    let first_page = movies_slice(conn, playlist_id, None, 0, FIRST_PAGE_SIZE)?;
    Ok((categories, first_page))
}

fn load_series_snapshot(
    conn: &Connection,
    playlist_id: &str,
) -> Result<(Vec<VodCategory>, Page<VodSeries>), ServiceError> {
    let categories = categories_with_counts(conn, playlist_id, ItemKind::Series)?;
    let first_page = series_slice(conn, playlist_id, None, 0, FIRST_PAGE_SIZE)?;
    Ok((categories, first_page))
}
