//! Hybrid per-category count service.
//!
//! Counts back the category sidebar badges, which re-render far more often
//! than the data changes, so results are memoized for five minutes per
//! (playlist, kind). A miss checks the store first: an empty partition with
//! a configured client triggers a full sync before counting, so first run
//! on a fresh install self-heals. If the aggregate query fails the counts
//! are rebuilt in process from the raw category-id column, logged at warn,
//! and cached like a normal result.

use std::collections::HashMap;

use flickstash_catalog::ItemKind;
use flickstash_db::{category_counts, item_category_ids, item_count};
use flickstash_xtream::XtreamClient;
use log::warn;
use rusqlite::Connection;
use tokio::time::{Duration, Instant};

use crate::error::ServiceError;
use crate::sync::{sync_movies, sync_series};

const COUNTS_TTL: Duration = Duration::from_secs(5 * 60);

struct Entry {
    counts: HashMap<String, i64>,
    loaded_at: Instant,
}

pub struct CountService {
    cache: HashMap<(String, ItemKind), Entry>,
}

impl CountService {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Per-category item counts for one (playlist, kind).
    pub async fn category_counts(
        &mut self,
        conn: &Connection,
        client: Option<&XtreamClient>,
        playlist_id: &str,
        kind: ItemKind,
    ) -> Result<HashMap<String, i64>, ServiceError> {
        let key = (playlist_id.to_string(), kind);
        if let Some(entry) = self.cache.get(&key) {
            if entry.loaded_at.elapsed() < COUNTS_TTL {
                return Ok(entry.counts.clone());
            }
        }

        // Empty partition and a configured provider: ingest before counting.
        if item_count(conn, playlist_id, kind)? == 0 {
            if let Some(client) = client {
                match kind {
                    ItemKind::Movie => {
                        sync_movies(client, conn, playlist_id).await?;
                    }
                    ItemKind::Series => {
                        sync_series(client, conn, playlist_id).await?;
                    }
                }
            }
        }

        let counts = match category_counts(conn, playlist_id, kind) {
            Ok(rows) => rows.into_iter().collect(),
            Err(e) => {
                warn!("count query failed for playlist {playlist_id} ({kind}): {e}; rebuilding in process");
                let mut counts: HashMap<String, i64> = HashMap::new();
                for category_id in item_category_ids(conn, playlist_id, kind)? {
                    *counts.entry(category_id).or_insert(0) += 1;
                }
                counts
            }
        };

        self.cache.insert(
            key,
            Entry {
                counts: counts.clone(),
                loaded_at: Instant::now(),
            },
        );
        Ok(counts)
    }

    /// Drop cached counts for one playlist, both kinds.
    pub fn invalidate(&mut self, playlist_id: &str) {
        self.cache.retain(|(playlist, _), _| playlist != playlist_id);
    }
}

impl Default for CountService {
    fn default() -> Self {
        Self::new()
    }
}
