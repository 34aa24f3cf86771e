use std::collections::HashSet;

use flickstash_catalog::{Favorite, ItemKind, VodCategory, VodMovie};
use flickstash_db::{add_movie, replace_categories, replace_movies};
use flickstash_service::VodCatalog;
use tempfile::TempDir;

fn movie(id: u32, name: &str, category: &str, added: u32) -> VodMovie {
    VodMovie {
        playlist_id: "p1".to_string(),
        movie_id: format!("m{id}"),
        category_id: category.to_string(),
        name: name.to_string(),
        stream_url: format!("http://host/movie/u/p/{id}.mp4"),
        cover_url: String::new(),
        backdrop_url: String::new(),
        rating: String::new(),
        duration: String::new(),
        genre: String::new(),
        release_date: String::new(),
        plot: String::new(),
        director: String::new(),
        cast: String::new(),
        added: added.to_string(),
        container_extension: "mp4".to_string(),
    }
}

fn favorite_of(m: &VodMovie) -> Favorite {
    Favorite {
        id: format!("fav-{}", m.movie_id),
        profile_id: "prof".to_string(),
        playlist_id: m.playlist_id.clone(),
        item_id: m.movie_id.clone(),
        kind: Some(ItemKind::Movie),
        name: m.name.clone(),
        stream_url: Some(m.stream_url.clone()),
        cover_url: Some(m.cover_url.clone()),
        category_id: Some(m.category_id.clone()),
        date_added: "1700000000".to_string(),
    }
}

fn open_catalog(dir: &TempDir) -> VodCatalog {
    VodCatalog::open_in_memory(dir.path().join("favorites.json"), "prof").unwrap()
}

async fn ingest(catalog: &VodCatalog, movies: &[VodMovie]) {
    let categories: Vec<VodCategory> = {
        let mut ids: Vec<&str> = movies.iter().map(|m| m.category_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.into_iter()
            .map(|id| VodCategory {
                playlist_id: "p1".to_string(),
                category_id: id.to_string(),
                name: id.to_string(),
                kind: ItemKind::Movie,
                parent_id: 0,
                item_count: 0,
            })
            .collect()
    };
    replace_categories(catalog.connection(), "p1", ItemKind::Movie, &categories).unwrap();
    replace_movies(catalog.connection(), "p1", movies).await.unwrap();
}

#[tokio::test]
async fn favorites_survive_a_catalog_wipe() {
    let dir = TempDir::new().unwrap();
    let mut catalog = open_catalog(&dir);

    let movies = vec![movie(1, "Keeper", "action", 1), movie(2, "Other", "action", 2)];
    ingest(&catalog, &movies).await;
    catalog.add_favorite(favorite_of(&movies[0])).unwrap();

    // Replace-all with an empty snapshot wipes the catalog rows.
    ingest(&catalog, &[]).await;
    catalog.refresh("p1");

    let regular = catalog.get_movie_page("p1", None, 0).unwrap();
    assert!(regular.items.is_empty());

    let favorites = catalog.get_movie_page("p1", Some("favorites"), 0).unwrap();
    assert_eq!(favorites.items.len(), 1);
    assert_eq!(favorites.items[0].name, "Keeper");
    assert_eq!(favorites.items[0].stream_url, "http://host/movie/u/p/1.mp4");
}

#[tokio::test]
async fn recently_watched_is_always_empty() {
    let dir = TempDir::new().unwrap();
    let mut catalog = open_catalog(&dir);
    ingest(&catalog, &[movie(1, "Something", "action", 1)]).await;

    let page = catalog.get_movie_page("p1", Some("recently_watched"), 0).unwrap();
    assert!(page.items.is_empty());
    assert!(!page.has_more);
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn recently_added_dedups_release_variants() {
    let dir = TempDir::new().unwrap();
    let mut catalog = open_catalog(&dir);

    // Newest first by `added`: the 4K re-release should shadow the older cuts.
    let movies = vec![
        movie(1, "FR| The Heist 4K", "action", 300),
        movie(2, "The Heist", "action", 200),
        movie(3, "EN| The Heist HD", "action", 100),
        movie(4, "Standalone", "action", 50),
    ];
    ingest(&catalog, &movies).await;

    let page = catalog.get_movie_page("p1", Some("recent"), 0).unwrap();
    let names: Vec<&str> = page.items.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["FR| The Heist 4K", "Standalone"]);
}

#[tokio::test]
async fn pages_use_the_two_tier_sizes() {
    let dir = TempDir::new().unwrap();
    let mut catalog = open_catalog(&dir);
    let movies: Vec<VodMovie> = (0..150)
        .map(|i| movie(i, &format!("Title {i:03}"), "action", i))
        .collect();
    ingest(&catalog, &movies).await;

    let first = catalog.get_movie_page("p1", None, 0).unwrap();
    assert_eq!(first.items.len(), 100);
    assert!(first.has_more);
    assert_eq!(first.total_count, 150);

    let second = catalog.get_movie_page("p1", None, 1).unwrap();
    assert_eq!(second.items.len(), 50);
    assert!(!second.has_more);

    let mut seen = HashSet::new();
    for m in first.items.iter().chain(second.items.iter()) {
        assert!(seen.insert(m.movie_id.clone()));
    }
    assert_eq!(seen.len(), 150);
}

#[tokio::test(start_paused = true)]
async fn snapshot_serves_warm_reads_until_refresh_or_expiry() {
    let dir = TempDir::new().unwrap();
    let mut catalog = open_catalog(&dir);
    let movies: Vec<VodMovie> = (0..5)
        .map(|i| movie(i, &format!("Title {i}"), "action", i))
        .collect();
    ingest(&catalog, &movies).await;

    assert_eq!(catalog.get_movie_page("p1", None, 0).unwrap().items.len(), 5);

    // A direct write does not show through the warm snapshot.
    add_movie(catalog.connection(), &movie(100, "Later", "action", 100)).unwrap();
    assert_eq!(catalog.get_movie_page("p1", None, 0).unwrap().items.len(), 5);

    // Explicit invalidation picks it up.
    catalog.refresh("p1");
    assert_eq!(catalog.get_movie_page("p1", None, 0).unwrap().items.len(), 6);

    // So does TTL expiry.
    add_movie(catalog.connection(), &movie(101, "Even Later", "action", 101)).unwrap();
    tokio::time::advance(std::time::Duration::from_secs(31 * 60)).await;
    assert_eq!(catalog.get_movie_page("p1", None, 0).unwrap().items.len(), 7);
}

#[tokio::test(start_paused = true)]
async fn category_counts_are_memoized_for_five_minutes() {
    let dir = TempDir::new().unwrap();
    let mut catalog = open_catalog(&dir);
    ingest(
        &catalog,
        &[movie(1, "A", "action", 1), movie(2, "B", "action", 2)],
    )
    .await;

    let counts = catalog.category_counts("p1", ItemKind::Movie).await.unwrap();
    assert_eq!(counts.get("action"), Some(&2));

    add_movie(catalog.connection(), &movie(3, "C", "action", 3)).unwrap();
    let counts = catalog.category_counts("p1", ItemKind::Movie).await.unwrap();
    assert_eq!(counts.get("action"), Some(&2), "within TTL the cached counts serve");

    tokio::time::advance(std::time::Duration::from_secs(6 * 60)).await;
    let counts = catalog.category_counts("p1", ItemKind::Movie).await.unwrap();
    assert_eq!(counts.get("action"), Some(&3));
}

#[tokio::test]
async fn toggle_favorite_roundtrips() {
    let dir = TempDir::new().unwrap();
    let catalog = open_catalog(&dir);
    let m = movie(1, "Toggled", "action", 1);

    assert!(catalog.toggle_favorite(favorite_of(&m)).unwrap());
    assert!(catalog.is_favorite("p1", "m1").unwrap());
    assert!(!catalog.toggle_favorite(favorite_of(&m)).unwrap());
    assert!(!catalog.is_favorite("p1", "m1").unwrap());
}
