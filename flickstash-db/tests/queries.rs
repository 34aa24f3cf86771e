use std::collections::HashSet;

use flickstash_catalog::{ItemKind, VodCategory, VodMovie};
use flickstash_db::{
    categories_with_counts, category_counts, item_category_ids, item_count, movies_page,
    open_memory, recent_movies, replace_categories, replace_movies, search_movies,
};
use rusqlite::Connection;

fn named_movie(id: u32, name: &str, category: &str, added: u32) -> VodMovie {
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

fn seed(conn: &Connection, movies: &[VodMovie]) {
    let mut categories: Vec<&str> = movies.iter().map(|m| m.category_id.as_str()).collect();
    categories.sort_unstable();
    categories.dedup();
    let cats: Vec<VodCategory> = categories
        .into_iter()
        .map(|id| VodCategory {
            playlist_id: "p1".to_string(),
            category_id: id.to_string(),
            name: id.to_string(),
            kind: ItemKind::Movie,
            parent_id: 0,
            item_count: 0,
        })
        .collect();
    replace_categories(conn, "p1", ItemKind::Movie, &cats).unwrap();
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    rt.block_on(replace_movies(conn, "p1", movies)).unwrap();
}

#[test]
fn pages_cover_the_category_exactly_once() {
    let conn = open_memory().unwrap();
    let movies: Vec<VodMovie> = (0..25)
        .map(|i| named_movie(i, &format!("Title {i:02}"), "cat", i))
        .collect();
    seed(&conn, &movies);

    for page_size in [1u32, 4, 7, 25, 100] {
        let mut seen = HashSet::new();
        let mut page = 0;
        loop {
            let result = movies_page(&conn, "p1", Some("cat"), page, page_size).unwrap();
            assert_eq!(result.total_count, 25);
            for m in &result.items {
                assert!(seen.insert(m.movie_id.clone()), "duplicate across pages");
            }
            if !result.has_more {
                break;
            }
            page += 1;
        }
        assert_eq!(seen.len(), 25, "page_size {page_size} missed rows");
    }
}

#[test]
fn latin_names_sort_before_everything_else() {
    let conn = open_memory().unwrap();
    let movies = vec![
        named_movie(1, "zebra", "cat", 1),
        named_movie(2, "4 Brothers", "cat", 2),
        named_movie(3, "Alpha", "cat", 3),
        named_movie(4, "Éclair", "cat", 4),
    ];
    seed(&conn, &movies);

    let page = movies_page(&conn, "p1", Some("cat"), 0, 10).unwrap();
    let names: Vec<&str> = page.items.iter().map(|m| m.name.as_str()).collect();
    // Latin-initial names first, case-insensitive inside the bucket.
    assert_eq!(names[0], "Alpha");
    assert_eq!(names[1], "zebra");
    assert!(names[2..].contains(&"4 Brothers"));
    assert!(names[2..].contains(&"Éclair"));
}

#[test]
fn unknown_category_is_an_empty_page() {
    let conn = open_memory().unwrap();
    seed(&conn, &[named_movie(1, "Only", "cat", 1)]);

    let page = movies_page(&conn, "p1", Some("missing"), 0, 20).unwrap();
    assert!(page.items.is_empty());
    assert!(!page.has_more);
    assert_eq!(page.total_count, 0);
}

#[test]
fn search_matches_substrings_and_respects_scope() {
    let conn = open_memory().unwrap();
    let movies = vec![
        named_movie(1, "The Matrix", "scifi", 1),
        named_movie(2, "Matrix Reloaded", "scifi", 2),
        named_movie(3, "Little Women", "drama", 3),
    ];
    seed(&conn, &movies);

    let hits = search_movies(&conn, "p1", "matrix", 20, None).unwrap();
    assert_eq!(hits.len(), 2);

    let scoped = search_movies(&conn, "p1", "m", 20, Some("drama")).unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].name, "Little Women");

    let limited = search_movies(&conn, "p1", "matrix", 1, None).unwrap();
    assert_eq!(limited.len(), 1);
}

#[test]
fn recent_scan_orders_added_numerically() {
    let conn = open_memory().unwrap();
    // Lexicographic order would put "99" above "100".
    let movies = vec![
        named_movie(1, "Old", "cat", 99),
        named_movie(2, "New", "cat", 100),
    ];
    seed(&conn, &movies);

    let recent = recent_movies(&conn, "p1").unwrap();
    assert_eq!(recent[0].name, "New");
    assert_eq!(recent[1].name, "Old");
}

#[test]
fn category_listing_buckets_language_prefixes_first() {
    let conn = open_memory().unwrap();
    let cats: Vec<VodCategory> = ["Zulu", "FR| Cinéma", "DE| Kino", "123 Kids", "Action"]
        .iter()
        .enumerate()
        .map(|(i, name)| VodCategory {
            playlist_id: "p1".to_string(),
            category_id: format!("c{i}"),
            name: name.to_string(),
            kind: ItemKind::Movie,
            parent_id: 0,
            item_count: 0,
        })
        .collect();
    replace_categories(&conn, "p1", ItemKind::Movie, &cats).unwrap();

    let listed = categories_with_counts(&conn, "p1", ItemKind::Movie).unwrap();
    let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["FR| Cinéma", "DE| Kino", "Action", "Zulu", "123 Kids"]);
}

#[test]
fn aggregate_counts_match_the_rows() {
    let conn = open_memory().unwrap();
    let movies = vec![
        named_movie(1, "A", "x", 1),
        named_movie(2, "B", "x", 2),
        named_movie(3, "C", "y", 3),
    ];
    seed(&conn, &movies);

    let mut counts = category_counts(&conn, "p1", ItemKind::Movie).unwrap();
    counts.sort();
    assert_eq!(counts, vec![("x".to_string(), 2), ("y".to_string(), 1)]);

    assert_eq!(item_count(&conn, "p1", ItemKind::Movie).unwrap(), 3);
    assert_eq!(item_count(&conn, "p2", ItemKind::Movie).unwrap(), 0);

    let ids = item_category_ids(&conn, "p1", ItemKind::Movie).unwrap();
    assert_eq!(ids.len(), 3);
}
