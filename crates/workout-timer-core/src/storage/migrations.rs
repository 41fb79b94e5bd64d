//! Preset database schema migrations.
//!
//! Migrations are versioned, additive-only, and applied automatically when
//! opening the database. Every added column carries an explicit default so
//! presets saved under any earlier schema keep working. The `schema_version`
//! table tracks the current version.

use indoc::indoc;
use rusqlite::{Connection, Result as SqliteResult};

/// Apply all pending migrations.
///
/// # Errors
/// Returns an error if a migration statement fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;
    let current = get_schema_version(conn);

    if current < 1 {
        migrate_v1(conn)?;
    }
    if current < 2 {
        migrate_v2(conn)?;
    }
    if current < 3 {
        migrate_v3(conn)?;
    }
    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Current schema version, 0 for a fresh database.
pub(crate) fn get_schema_version(conn: &Connection) -> i32 {
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

/// v1: base presets table — interval timers only.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(indoc! {"
        CREATE TABLE IF NOT EXISTS presets (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            name             TEXT NOT NULL,
            total_minutes    INTEGER NOT NULL,
            audio_enabled    INTEGER NOT NULL DEFAULT 1,
            cue_style        TEXT NOT NULL DEFAULT 'tone',
            cue_lead_seconds INTEGER NOT NULL DEFAULT 3,
            created_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_presets_created_at ON presets(created_at);
    "})?;
    set_schema_version(conn, 1)
}

/// v2: optional get-ready countdown before the run starts.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "ALTER TABLE presets ADD COLUMN initial_countdown_seconds INTEGER NOT NULL DEFAULT 0;",
    )?;
    tx.execute("DELETE FROM schema_version", [])?;
    tx.execute("INSERT INTO schema_version (version) VALUES (2)", [])?;
    tx.commit()
}

/// v3: hold/rest mode. Existing presets default to interval mode.
fn migrate_v3(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(indoc! {"
        ALTER TABLE presets ADD COLUMN mode TEXT NOT NULL DEFAULT 'interval';
        ALTER TABLE presets ADD COLUMN hold_seconds INTEGER NOT NULL DEFAULT 7;
        ALTER TABLE presets ADD COLUMN rest_seconds INTEGER NOT NULL DEFAULT 3;
        ALTER TABLE presets ADD COLUMN total_repetitions INTEGER NOT NULL DEFAULT 6;
    "})?;
    tx.execute("DELETE FROM schema_version", [])?;
    tx.execute("INSERT INTO schema_version (version) VALUES (3)", [])?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_from_scratch_reaches_v3() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 3);

        // All v3 columns queryable.
        conn.prepare(
            "SELECT name, total_minutes, initial_countdown_seconds, mode,
                    hold_seconds, rest_seconds, total_repetitions
             FROM presets",
        )
        .unwrap();
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 3);
    }

    #[test]
    fn incremental_migration_keeps_existing_rows() {
        let conn = Connection::open_in_memory().unwrap();

        // A v1-era database with one saved preset.
        conn.execute_batch(
            "CREATE TABLE schema_version (version INTEGER PRIMARY KEY);
             INSERT INTO schema_version (version) VALUES (1);
             CREATE TABLE presets (
                 id               INTEGER PRIMARY KEY AUTOINCREMENT,
                 name             TEXT NOT NULL,
                 total_minutes    INTEGER NOT NULL,
                 audio_enabled    INTEGER NOT NULL DEFAULT 1,
                 cue_style        TEXT NOT NULL DEFAULT 'tone',
                 cue_lead_seconds INTEGER NOT NULL DEFAULT 3,
                 created_at       TEXT NOT NULL
             );
             INSERT INTO presets (name, total_minutes, created_at)
             VALUES ('EMOM 20', 20, '2024-01-01T12:00:00+00:00');",
        )
        .unwrap();

        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 3);

        // The old row picked up every default.
        let (mode, countdown, hold): (String, i64, i64) = conn
            .query_row(
                "SELECT mode, initial_countdown_seconds, hold_seconds
                 FROM presets WHERE name = 'EMOM 20'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(mode, "interval");
        assert_eq!(countdown, 0);
        assert_eq!(hold, 7);
    }
}
