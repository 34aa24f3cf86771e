//! SQLite schema creation and migration.

use flickstash_catalog::ItemKind;
use rusqlite::Connection;
use thiserror::Error;

use crate::counters;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Counter error: {0}")]
    Counter(#[from] counters::CounterError),
    #[error("Migration error: expected version {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 1;

/// Create all tables, indexes, and counter triggers if they don't exist.
///
/// This is idempotent — safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    counters::arm(conn, ItemKind::Movie)?;
    counters::arm(conn, ItemKind::Series)?;
    set_schema_version(conn, CURRENT_VERSION)?;
    Ok(())
}

/// Open or create a catalog database at the given path.
///
/// cache_size/temp_store are tuned for bulk loads of 100K+ rows; WAL keeps
/// concurrent readers off the writer's back during ingestion.
pub fn open_database(path: &std::path::Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;
         PRAGMA cache_size=-64000;
         PRAGMA temp_store=MEMORY;",
    )?;

    let version = get_schema_version(&conn)?;
    if version == 0 {
        create_schema(&conn)?;
    } else if version < CURRENT_VERSION {
        migrate(&conn, version)?;
    } else if version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: version,
        });
    }

    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Get the current schema version, or 0 if no schema exists.
fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Record a schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run migrations from `from_version` up to `CURRENT_VERSION`.
fn migrate(conn: &Connection, from_version: i32) -> Result<(), SchemaError> {
    let mut version = from_version;
    while version < CURRENT_VERSION {
        // No migrations yet; the match grows with CURRENT_VERSION.
        #[allow(clippy::match_single_binding)]
        match version {
            _ => {}
        }
        version += 1;
        set_schema_version(conn, version)?;
    }

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Provider categories. Movie and series partitions share this table,
-- distinguished by the kind tag; every delete/replace must filter by
-- playlist_id AND kind.
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    playlist_id TEXT NOT NULL,
    category_id TEXT NOT NULL,
    name TEXT NOT NULL,
    kind TEXT NOT NULL,
    parent_id INTEGER NOT NULL DEFAULT 0,
    item_count INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
    UNIQUE(playlist_id, category_id, kind)
);
CREATE INDEX IF NOT EXISTS idx_categories_playlist ON categories(playlist_id);

-- Movies. Provider fields stored as delivered; added is an epoch-seconds
-- string assigned by the provider.
CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    playlist_id TEXT NOT NULL,
    movie_id TEXT NOT NULL,
    category_id TEXT NOT NULL,
    name TEXT NOT NULL,
    stream_url TEXT NOT NULL,
    cover_url TEXT NOT NULL DEFAULT '',
    backdrop_url TEXT NOT NULL DEFAULT '',
    rating TEXT NOT NULL DEFAULT '',
    duration TEXT NOT NULL DEFAULT '',
    genre TEXT NOT NULL DEFAULT '',
    release_date TEXT NOT NULL DEFAULT '',
    plot TEXT NOT NULL DEFAULT '',
    director TEXT NOT NULL DEFAULT '',
    "cast" TEXT NOT NULL DEFAULT '',
    added TEXT NOT NULL DEFAULT '',
    container_extension TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
);
CREATE INDEX IF NOT EXISTS idx_movies_playlist_category ON movies(playlist_id, category_id);
CREATE INDEX IF NOT EXISTS idx_movies_name ON movies(name);

-- Series. Same metadata shape minus the stream URL, plus episode/season
-- counts; episodes themselves are not cataloged.
CREATE TABLE IF NOT EXISTS series (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    playlist_id TEXT NOT NULL,
    series_id TEXT NOT NULL,
    category_id TEXT NOT NULL,
    name TEXT NOT NULL,
    cover_url TEXT NOT NULL DEFAULT '',
    backdrop_url TEXT NOT NULL DEFAULT '',
    rating TEXT NOT NULL DEFAULT '',
    genre TEXT NOT NULL DEFAULT '',
    release_date TEXT NOT NULL DEFAULT '',
    plot TEXT NOT NULL DEFAULT '',
    director TEXT NOT NULL DEFAULT '',
    "cast" TEXT NOT NULL DEFAULT '',
    episodes_count INTEGER NOT NULL DEFAULT 0,
    seasons_count INTEGER NOT NULL DEFAULT 0,
    added TEXT NOT NULL DEFAULT '',
    last_updated TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
);
CREATE INDEX IF NOT EXISTS idx_series_playlist_category ON series(playlist_id, category_id);
CREATE INDEX IF NOT EXISTS idx_series_name ON series(name);
"#;
