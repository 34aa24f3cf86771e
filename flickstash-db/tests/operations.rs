use flickstash_catalog::{ItemKind, VodCategory, VodMovie, VodSeries};
use flickstash_db::{
    add_movie, add_series, open_memory, recategorize_movie, remove_movie, remove_series,
    replace_categories, CounterCycle, CounterError, StoreError,
};
use rusqlite::Connection;

fn seed_categories(conn: &Connection, kind: ItemKind, ids: &[&str]) {
    let cats: Vec<VodCategory> = ids
        .iter()
        .map(|id| VodCategory {
            playlist_id: "p1".to_string(),
            category_id: id.to_string(),
            name: id.to_string(),
            kind,
            parent_id: 0,
            item_count: 0,
        })
        .collect();
    replace_categories(conn, "p1", kind, &cats).unwrap();
}

fn movie(id: &str, category: &str) -> VodMovie {
    VodMovie {
        playlist_id: "p1".to_string(),
        movie_id: id.to_string(),
        category_id: category.to_string(),
        name: format!("Movie {id}"),
        stream_url: "http://host/movie/u/p/1.mp4".to_string(),
        cover_url: String::new(),
        backdrop_url: String::new(),
        rating: String::new(),
        duration: String::new(),
        genre: String::new(),
        release_date: String::new(),
        plot: String::new(),
        director: String::new(),
        cast: String::new(),
        added: "1".to_string(),
        container_extension: "mp4".to_string(),
    }
}

fn series(id: &str, category: &str) -> VodSeries {
    VodSeries {
        playlist_id: "p1".to_string(),
        series_id: id.to_string(),
        category_id: category.to_string(),
        name: format!("Series {id}"),
        cover_url: String::new(),
        backdrop_url: String::new(),
        rating: String::new(),
        genre: String::new(),
        release_date: String::new(),
        plot: String::new(),
        director: String::new(),
        cast: String::new(),
        episodes_count: 0,
        seasons_count: 0,
        added: "1".to_string(),
        last_updated: String::new(),
    }
}

fn count_of(conn: &Connection, category: &str, kind: ItemKind) -> i64 {
    conn.query_row(
        "SELECT item_count FROM categories WHERE playlist_id = 'p1' AND category_id = ?1 AND kind = ?2",
        rusqlite::params![category, kind.as_str()],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn triggers_track_add_remove_recategorize() {
    let conn = open_memory().unwrap();
    seed_categories(&conn, ItemKind::Movie, &["a", "b"]);

    add_movie(&conn, &movie("m1", "a")).unwrap();
    add_movie(&conn, &movie("m2", "a")).unwrap();
    add_movie(&conn, &movie("m3", "b")).unwrap();
    assert_eq!(count_of(&conn, "a", ItemKind::Movie), 2);
    assert_eq!(count_of(&conn, "b", ItemKind::Movie), 1);

    recategorize_movie(&conn, "p1", "m2", "b").unwrap();
    assert_eq!(count_of(&conn, "a", ItemKind::Movie), 1);
    assert_eq!(count_of(&conn, "b", ItemKind::Movie), 2);

    remove_movie(&conn, "p1", "m1").unwrap();
    assert_eq!(count_of(&conn, "a", ItemKind::Movie), 0);
}

#[test]
fn series_triggers_never_bump_movie_categories() {
    let conn = open_memory().unwrap();
    // One category id present in both partitions.
    seed_categories(&conn, ItemKind::Movie, &["shared"]);
    seed_categories(&conn, ItemKind::Series, &["shared"]);

    add_series(&conn, &series("s1", "shared")).unwrap();
    add_series(&conn, &series("s2", "shared")).unwrap();
    assert_eq!(count_of(&conn, "shared", ItemKind::Series), 2);
    assert_eq!(count_of(&conn, "shared", ItemKind::Movie), 0);

    remove_series(&conn, "p1", "s1").unwrap();
    assert_eq!(count_of(&conn, "shared", ItemKind::Series), 1);
    assert_eq!(count_of(&conn, "shared", ItemKind::Movie), 0);
}

#[test]
fn removing_a_missing_row_reports_not_found() {
    let conn = open_memory().unwrap();
    seed_categories(&conn, ItemKind::Movie, &["a"]);

    let err = remove_movie(&conn, "p1", "nope").unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn counter_cycle_refuses_to_finish_without_recompute() {
    let conn = open_memory().unwrap();
    let cycle = CounterCycle::begin(&conn, ItemKind::Movie).unwrap();
    let err = cycle.finish(&conn).unwrap_err();
    assert!(matches!(err, CounterError::RecomputeSkipped));
}

#[test]
fn counter_cycle_rearms_triggers() {
    let conn = open_memory().unwrap();
    seed_categories(&conn, ItemKind::Movie, &["a"]);

    let mut cycle = CounterCycle::begin(&conn, ItemKind::Movie).unwrap();
    // Triggers are down: direct inserts leave the counter untouched.
    add_movie(&conn, &movie("m1", "a")).unwrap();
    assert_eq!(count_of(&conn, "a", ItemKind::Movie), 0);

    cycle.recompute(&conn, "p1").unwrap();
    assert_eq!(count_of(&conn, "a", ItemKind::Movie), 1);

    cycle.finish(&conn).unwrap();
    add_movie(&conn, &movie("m2", "a")).unwrap();
    assert_eq!(count_of(&conn, "a", ItemKind::Movie), 2);
}
