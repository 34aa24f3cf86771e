//! JSON-file favorites store.
//!
//! Favorites live outside SQLite on purpose: catalog ingestion is
//! replace-all, and a file the ingest path never touches cannot lose
//! entries to a wipe. Each entry is a denormalized snapshot of the item at
//! favoriting time, keyed by (profile_id, playlist_id, item_id).

use std::path::PathBuf;

use flickstash_catalog::Favorite;

use crate::error::ServiceError;

pub struct JsonFavoritesStore {
    path: PathBuf,
}

impl JsonFavoritesStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// All favorites for one profile within one playlist.
    pub fn favorites_for(
        &self,
        profile_id: &str,
        playlist_id: &str,
    ) -> Result<Vec<Favorite>, ServiceError> {
        let all = self.load()?;
        Ok(all
            .into_iter()
            .filter(|f| f.profile_id == profile_id && f.playlist_id == playlist_id)
            .collect())
    }

    pub fn is_favorite(
        &self,
        profile_id: &str,
        playlist_id: &str,
        item_id: &str,
    ) -> Result<bool, ServiceError> {
        let all = self.load()?;
        Ok(all.iter().any(|f| matches(f, profile_id, playlist_id, item_id)))
    }

    /// Add a favorite, replacing any existing entry for the same item.
    pub fn add(&self, fav: Favorite) -> Result<(), ServiceError> {
        let mut all = self.load()?;
        all.retain(|f| !matches(f, &fav.profile_id, &fav.playlist_id, &fav.item_id));
        all.push(fav);
        self.save(&all)
    }

    /// Remove a favorite. Returns whether an entry existed.
    pub fn remove(
        &self,
        profile_id: &str,
        playlist_id: &str,
        item_id: &str,
    ) -> Result<bool, ServiceError> {
        let mut all = self.load()?;
        let before = all.len();
        all.retain(|f| !matches(f, profile_id, playlist_id, item_id));
        let removed = all.len() != before;
        if removed {
            self.save(&all)?;
        }
        Ok(removed)
    }

    /// Add the favorite if absent, remove it if present. Returns whether
    /// the item is a favorite afterwards.
    pub fn toggle(&self, fav: Favorite) -> Result<bool, ServiceError> {
        if self.remove(&fav.profile_id, &fav.playlist_id, &fav.item_id)? {
            Ok(false)
        } else {
            self.add(fav)?;
            Ok(true)
        }
    }

    fn load(&self) -> Result<Vec<Favorite>, ServiceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, favorites: &[Favorite]) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(favorites)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

fn matches(fav: &Favorite, profile_id: &str, playlist_id: &str, item_id: &str) -> bool {
    fav.profile_id == profile_id && fav.playlist_id == playlist_id && fav.item_id == item_id
}
