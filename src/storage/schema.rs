//! Database schema setup
//!
//! Creates the four tables and their indexes if they don't exist yet. Dates
//! are stored as `YYYY-MM-DD` text so lexical comparison is chronological and
//! `strftime('%w', date)` yields the weekday.

use rusqlite::Connection;

use crate::storage::StorageError;

/// Initialize the database schema
///
/// Safe to call on every startup; existing tables are left alone.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS habit_week_days (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id TEXT NOT NULL,
            week_day INTEGER NOT NULL CHECK (week_day BETWEEN 0 AND 6),
            FOREIGN KEY (habit_id) REFERENCES habits (id),
            UNIQUE (habit_id, week_day)
        );

        CREATE TABLE IF NOT EXISTS days (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS day_habits (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            day_id TEXT NOT NULL,
            habit_id TEXT NOT NULL,
            FOREIGN KEY (day_id) REFERENCES days (id),
            FOREIGN KEY (habit_id) REFERENCES habits (id),
            UNIQUE (day_id, habit_id)
        );",
    )?;

    create_indexes(conn)?;

    tracing::info!("Database schema ready");
    Ok(())
}

fn create_indexes(conn: &Connection) -> Result<(), StorageError> {
    // Possible-habit lookups filter by weekday first
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habit_week_days_week_day
         ON habit_week_days (week_day, habit_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_created_at
         ON habits (created_at)",
        [],
    )?;

    Ok(())
}
