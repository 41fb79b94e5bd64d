//! SQLite-backed preset storage.
//!
//! Presets are read by id when a run starts and listed newest-first for
//! display. The timer engine never writes presets; all writes come from the
//! edit boundary, which clamps values before they get here.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::error::{CoreError, DatabaseError};
use crate::preset::{CueStyle, TimerMode, TimerPreset};

use super::{data_dir, migrations};

/// Preset database handle.
pub struct PresetDb {
    conn: Connection,
}

impl PresetDb {
    /// Open the database at `<data_dir>/workout-timer.db`, creating and
    /// migrating it as needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()
            .map_err(|e| CoreError::Custom(e.to_string()))?
            .join("workout-timer.db");
        let conn = Connection::open(&path).map_err(|source| {
            CoreError::Database(DatabaseError::OpenFailed { path, source })
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Database(DatabaseError::from(e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, CoreError> {
        migrations::migrate(&conn)
            .map_err(|e| CoreError::Database(DatabaseError::MigrationFailed(e.to_string())))?;
        Ok(Self { conn })
    }

    /// Insert a preset and return its new id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn insert(&self, preset: &TimerPreset) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO presets (name, mode, total_minutes, audio_enabled, cue_style,
                                  cue_lead_seconds, initial_countdown_seconds,
                                  hold_seconds, rest_seconds, total_repetitions, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                preset.name,
                preset.mode.as_str(),
                preset.total_minutes,
                preset.audio_enabled,
                preset.cue_style.as_str(),
                preset.cue_lead_seconds,
                preset.initial_countdown_seconds,
                preset.hold_seconds,
                preset.rest_seconds,
                preset.total_repetitions,
                preset.created_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Update an existing preset by its id.
    ///
    /// # Errors
    /// Returns [`DatabaseError::PresetNotFound`] if no row matches.
    pub fn update(&self, preset: &TimerPreset) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE presets SET name = ?1, mode = ?2, total_minutes = ?3, audio_enabled = ?4,
                                cue_style = ?5, cue_lead_seconds = ?6,
                                initial_countdown_seconds = ?7, hold_seconds = ?8,
                                rest_seconds = ?9, total_repetitions = ?10
             WHERE id = ?11",
            params![
                preset.name,
                preset.mode.as_str(),
                preset.total_minutes,
                preset.audio_enabled,
                preset.cue_style.as_str(),
                preset.cue_lead_seconds,
                preset.initial_countdown_seconds,
                preset.hold_seconds,
                preset.rest_seconds,
                preset.total_repetitions,
                preset.id,
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::PresetNotFound(preset.id));
        }
        Ok(())
    }

    /// Load a preset by id.
    pub fn get(&self, id: i64) -> Result<Option<TimerPreset>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
        let result = stmt.query_row(params![id], row_to_preset);
        match result {
            Ok(p) => Ok(Some(p)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All presets, newest first.
    pub fn list(&self) -> Result<Vec<TimerPreset>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC"))?;
        let rows = stmt.query_map([], row_to_preset)?;
        let mut presets = Vec::new();
        for row in rows {
            presets.push(row?);
        }
        Ok(presets)
    }

    /// Delete a preset by id.
    ///
    /// # Errors
    /// Returns [`DatabaseError::PresetNotFound`] if no row matches.
    pub fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let changed = self
            .conn
            .execute("DELETE FROM presets WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DatabaseError::PresetNotFound(id));
        }
        Ok(())
    }
}

const SELECT_COLUMNS: &str = "SELECT id, name, mode, total_minutes, audio_enabled, cue_style,
            cue_lead_seconds, initial_countdown_seconds, hold_seconds,
            rest_seconds, total_repetitions, created_at
     FROM presets";

fn row_to_preset(row: &Row<'_>) -> rusqlite::Result<TimerPreset> {
    let mode: String = row.get(2)?;
    let cue_style: String = row.get(5)?;
    let created_at: String = row.get(11)?;
    Ok(TimerPreset {
        id: row.get(0)?,
        name: row.get(1)?,
        mode: TimerMode::from_db(&mode),
        total_minutes: row.get(3)?,
        audio_enabled: row.get(4)?,
        cue_style: CueStyle::from_db(&cue_style),
        cue_lead_seconds: row.get(6)?,
        initial_countdown_seconds: row.get(7)?,
        hold_seconds: row.get(8)?,
        rest_seconds: row.get(9)?,
        total_repetitions: row.get(10)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
