use flickstash_db::schema::{create_schema, open_database, open_memory, CURRENT_VERSION};

#[test]
fn memory_database_has_full_schema() {
    let conn = open_memory().unwrap();

    for table in ["categories", "movies", "series", "schema_version"] {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "missing table {table}");
    }

    // Counter triggers are armed for both kinds.
    let trigger_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='trigger'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(trigger_count, 6);
}

#[test]
fn create_schema_is_idempotent() {
    let conn = open_memory().unwrap();
    create_schema(&conn).unwrap();

    let version: i32 = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(version, CURRENT_VERSION);
}

#[test]
fn reopening_a_database_keeps_its_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    {
        let conn = open_database(&path).unwrap();
        conn.execute(
            "INSERT INTO categories (playlist_id, category_id, name, kind) VALUES ('p1', 'c1', 'Action', 'movie')",
            [],
        )
        .unwrap();
    }

    let conn = open_database(&path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}
