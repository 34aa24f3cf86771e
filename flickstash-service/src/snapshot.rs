//! Per-playlist snapshot cache for the browse surface.
//!
//! A consumer opening a catalog view needs the category list and the first
//! page in one round trip; both change only when the playlist is re-synced.
//! The cache holds that pair per playlist for 30 minutes, so a warm open
//! issues zero store queries. The first page is deliberately smaller than
//! the follow-up pages: 100 rows paint the screen fast, 300-row pages keep
//! scroll fetches infrequent.

use std::collections::HashMap;

use flickstash_catalog::{Page, VodCategory};
use tokio::time::{Duration, Instant};

/// Rows in the cached first page.
pub const FIRST_PAGE_SIZE: u32 = 100;
/// Rows in every subsequent page.
pub const PAGE_SIZE: u32 = 300;

const SNAPSHOT_TTL: Duration = Duration::from_secs(30 * 60);

/// A cached browse snapshot for one playlist.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub categories: Vec<VodCategory>,
    pub first_page: Page<T>,
    loaded_at: Instant,
}

pub struct SnapshotCache<T> {
    entries: HashMap<String, Snapshot<T>>,
}

impl<T> SnapshotCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The cached snapshot if fresh, otherwise whatever `load` produces,
    /// cached under a new timestamp.
    pub fn get_or_load<E>(
        &mut self,
        playlist_id: &str,
        load: impl FnOnce() -> Result<(Vec<VodCategory>, Page<T>), E>,
    ) -> Result<&Snapshot<T>, E> {
        use std::collections::hash_map::Entry;
        match self.entries.entry(playlist_id.to_string()) {
            Entry::Occupied(occupied)
                if occupied.get().loaded_at.elapsed() < SNAPSHOT_TTL =>
            {
                Ok(occupied.into_mut())
            }
            entry => {
                let (categories, first_page) = load()?;
                let snapshot = Snapshot {
                    categories,
                    first_page,
                    loaded_at: Instant::now(),
                };
                match entry {
                    Entry::Occupied(mut occupied) => {
                        occupied.insert(snapshot);
                        Ok(occupied.into_mut())
                    }
                    Entry::Vacant(vacant) => Ok(vacant.insert(snapshot)),
                }
            }
        }
    }

    /// Drop the cached snapshot for one playlist, e.g. after a sync.
    pub fn invalidate(&mut self, playlist_id: &str) {
        self.entries.remove(playlist_id);
    }
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Row offset of a page in the two-tier scheme: page 0 is the first
/// [`FIRST_PAGE_SIZE`] rows, page n covers the next [`PAGE_SIZE`]-row window.
pub fn page_offset(page: u32) -> i64 {
    if page == 0 {
        0
    } else {
        FIRST_PAGE_SIZE as i64 + (page as i64 - 1) * PAGE_SIZE as i64
    }
}

/// Rows to fetch for a page in the two-tier scheme.
pub fn page_limit(page: u32) -> u32 {
    if page == 0 {
        FIRST_PAGE_SIZE
    } else {
        PAGE_SIZE
    }
}
