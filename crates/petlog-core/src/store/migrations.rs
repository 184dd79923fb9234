//! Schema migrations for the SQLite store.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version. Increment when adding a migration.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations.
///
/// # Errors
/// Returns an error if a migration statement fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        migrate_v1(conn)?;
    }
    if current < 2 {
        migrate_v2(conn)?;
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or(0)
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// v1: events and the daily rollup ledger.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS events (
            id            TEXT PRIMARY KEY,
            owner_id      TEXT NOT NULL,
            pet_id        TEXT,
            start_ms      INTEGER NOT NULL,
            end_ms        INTEGER NOT NULL,
            duration_secs INTEGER NOT NULL,
            category      TEXT NOT NULL,
            note          TEXT,
            created_ms    INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_events_owner_end ON events(owner_id, end_ms);
        CREATE INDEX IF NOT EXISTS idx_events_owner_pet_end ON events(owner_id, pet_id, end_ms);

        -- Day keys are zero-padded YYYY-MM-DD so string range scans are
        -- chronological.
        CREATE TABLE IF NOT EXISTS daily_rollup (
            owner_id TEXT NOT NULL,
            day      TEXT NOT NULL,
            count    INTEGER NOT NULL,
            PRIMARY KEY (owner_id, day)
        );

        CREATE INDEX IF NOT EXISTS idx_daily_rollup_day ON daily_rollup(day);",
    )
}

/// v2: per-pet reminder configuration.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS reminder_config (
            pet_id             TEXT NOT NULL,
            owner_id           TEXT NOT NULL,
            inactivity_enabled INTEGER NOT NULL DEFAULT 1,
            frequency_enabled  INTEGER NOT NULL DEFAULT 1,
            quiet_start_min    INTEGER NOT NULL DEFAULT 0,
            quiet_end_min      INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (pet_id, owner_id)
        );",
    )
}
