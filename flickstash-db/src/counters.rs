//! Denormalized category counter maintenance.
//!
//! Counters move through three states:
//!
//! - **steady**: triggers keep `item_count` exact on every single-row
//!   insert, delete, or recategorize;
//! - **suspended**: triggers dropped for a bulk load, counts stale;
//! - **recomputed**: one aggregate pass sets every count exactly.
//!
//! [`CounterCycle`] walks a bulk load through suspended → recomputed and
//! refuses to return to steady state if the recompute step was skipped.

use flickstash_catalog::ItemKind;
use rusqlite::{params, Connection};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("counter cycle finished without a recompute")]
    RecomputeSkipped,
}

/// The item table for a kind.
pub(crate) fn item_table(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Movie => "movies",
        ItemKind::Series => "series",
    }
}

// ── Bulk-load cycle ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleState {
    Suspended,
    Recomputed,
}

/// Drives counter maintenance for one bulk load of one kind.
///
/// Obtain with [`CounterCycle::begin`] inside the load's transaction, call
/// [`recompute`](Self::recompute) after the last batch, then
/// [`finish`](Self::finish) to re-arm the triggers.
pub struct CounterCycle {
    kind: ItemKind,
    state: CycleState,
}

impl CounterCycle {
    /// Suspend steady-state maintenance for a bulk load (steady → suspended).
    pub fn begin(conn: &Connection, kind: ItemKind) -> Result<Self, CounterError> {
        suspend(conn, kind)?;
        Ok(Self {
            kind,
            state: CycleState::Suspended,
        })
    }

    /// One aggregate pass setting every count for (playlist, kind) exactly
    /// (suspended → recomputed). Never per-row work.
    pub fn recompute(
        &mut self,
        conn: &Connection,
        playlist_id: &str,
    ) -> Result<(), CounterError> {
        recompute_counts(conn, playlist_id, self.kind)?;
        self.state = CycleState::Recomputed;
        Ok(())
    }

    /// Re-arm the triggers for steady state (recomputed → steady).
    ///
    /// Errors with [`CounterError::RecomputeSkipped`] if no recompute ran,
    /// since re-arming over stale counts would freeze the drift in.
    pub fn finish(self, conn: &Connection) -> Result<(), CounterError> {
        if self.state != CycleState::Recomputed {
            return Err(CounterError::RecomputeSkipped);
        }
        arm(conn, self.kind)
    }
}

// ── Transitions ─────────────────────────────────────────────────────────────

/// Create the steady-state counter triggers for a kind.
pub fn arm(conn: &Connection, kind: ItemKind) -> Result<(), CounterError> {
    conn.execute_batch(&trigger_ddl(kind))?;
    Ok(())
}

/// Drop the steady-state counter triggers for a kind.
pub fn suspend(conn: &Connection, kind: ItemKind) -> Result<(), CounterError> {
    let table = item_table(kind);
    conn.execute_batch(&format!(
        "DROP TRIGGER IF EXISTS {table}_count_insert;
         DROP TRIGGER IF EXISTS {table}_count_delete;
         DROP TRIGGER IF EXISTS {table}_count_move;"
    ))?;
    Ok(())
}

/// Set every category count for (playlist, kind) from one aggregate query.
pub fn recompute_counts(
    conn: &Connection,
    playlist_id: &str,
    kind: ItemKind,
) -> Result<(), CounterError> {
    let table = item_table(kind);
    conn.execute(
        &format!(
            "UPDATE categories
             SET item_count = (
                 SELECT COUNT(*) FROM {table}
                 WHERE {table}.playlist_id = categories.playlist_id
                   AND {table}.category_id = categories.category_id
             ),
             updated_at = strftime('%s', 'now')
             WHERE playlist_id = ?1 AND kind = ?2"
        ),
        params![playlist_id, kind.as_str()],
    )?;
    Ok(())
}

/// Trigger DDL for one kind. Category updates are scoped by kind so a
/// series insert never bumps a movie category sharing the same id.
fn trigger_ddl(kind: ItemKind) -> String {
    let table = item_table(kind);
    let tag = kind.as_str();
    format!(
        "CREATE TRIGGER IF NOT EXISTS {table}_count_insert
         AFTER INSERT ON {table}
         BEGIN
             UPDATE categories
             SET item_count = item_count + 1,
                 updated_at = strftime('%s', 'now')
             WHERE playlist_id = NEW.playlist_id
               AND category_id = NEW.category_id
               AND kind = '{tag}';
         END;

         CREATE TRIGGER IF NOT EXISTS {table}_count_delete
         AFTER DELETE ON {table}
         BEGIN
             UPDATE categories
             SET item_count = item_count - 1,
                 updated_at = strftime('%s', 'now')
             WHERE playlist_id = OLD.playlist_id
               AND category_id = OLD.category_id
               AND kind = '{tag}';
         END;

         CREATE TRIGGER IF NOT EXISTS {table}_count_move
         AFTER UPDATE OF category_id ON {table}
         WHEN OLD.category_id != NEW.category_id
         BEGIN
             UPDATE categories
             SET item_count = item_count - 1,
                 updated_at = strftime('%s', 'now')
             WHERE playlist_id = OLD.playlist_id
               AND category_id = OLD.category_id
               AND kind = '{tag}';

             UPDATE categories
             SET item_count = item_count + 1,
                 updated_at = strftime('%s', 'now')
             WHERE playlist_id = NEW.playlist_id
               AND category_id = NEW.category_id
               AND kind = '{tag}';
         END;"
    )
}
