//! SQLite implementation of the habit storage interface
//!
//! This module provides the concrete SQLite implementation for storing
//! and retrieving habit data. It handles all SQL queries and data conversion.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{dates, Completion, Day, DayId, DaySummary, Habit, HabitId, WeekDay};
use crate::storage::{schema, HabitStorage, StorageError};

/// Shared SELECT for habits; weekdays come back as a comma separated list
const SELECT_HABITS: &str = "SELECT h.id, h.title, h.created_at,
        (SELECT GROUP_CONCAT(w.week_day) FROM habit_week_days w WHERE w.habit_id = h.id)
     FROM habits h";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and creates the schema if needed.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a private in-memory database, mostly useful for tests
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            StorageError::Connection(format!("Failed to open in-memory database: {}", e))
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        // Enable foreign key constraints
        conn.execute("PRAGMA foreign_keys = ON", []).map_err(|e| {
            StorageError::Connection(format!("Failed to enable foreign keys: {}", e))
        })?;

        schema::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    fn query_habits(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Habit>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let habits = stmt
            .query_map(params, habit_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(habits)
    }
}

fn invalid_column(idx: usize, what: &str) -> rusqlite::Error {
    rusqlite::Error::InvalidColumnType(idx, what.to_string(), rusqlite::types::Type::Text)
}

fn parse_date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    dates::parse_stored(&raw).ok_or_else(|| invalid_column(idx, "Invalid date"))
}

fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    let id_str: String = row.get(0)?;
    let id = HabitId::from_string(&id_str).map_err(|_| invalid_column(0, "Invalid UUID"))?;

    let created_at = parse_date_column(row, 2)?;

    let week_days_csv: Option<String> = row.get(3)?;
    let mut week_days = week_days_csv
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .ok()
                .and_then(|i| WeekDay::new(i).ok())
                .ok_or_else(|| invalid_column(3, "Invalid week day"))
        })
        .collect::<rusqlite::Result<Vec<_>>>()?;
    week_days.sort();

    Ok(Habit::from_existing(id, row.get(1)?, created_at, week_days))
}

fn day_from_row(row: &Row<'_>) -> rusqlite::Result<Day> {
    let id_str: String = row.get(0)?;
    let id = DayId::from_string(&id_str).map_err(|_| invalid_column(0, "Invalid UUID"))?;

    Ok(Day {
        id,
        date: parse_date_column(row, 1)?,
    })
}

impl HabitStorage for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO habits (id, title, created_at) VALUES (?1, ?2, ?3)",
            params![
                habit.id.to_string(),
                habit.title,
                habit.created_at.format(dates::DATE_FORMAT).to_string(),
            ],
        )?;

        {
            let mut stmt =
                tx.prepare("INSERT INTO habit_week_days (habit_id, week_day) VALUES (?1, ?2)")?;
            for week_day in &habit.week_days {
                stmt.execute(params![habit.id.to_string(), week_day.index()])?;
            }
        }

        tx.commit()?;

        tracing::debug!("Created habit: {} ({})", habit.title, habit.id);
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let sql = format!("{SELECT_HABITS} WHERE h.id = ?1");

        self.conn
            .query_row(&sql, params![habit_id.to_string()], habit_from_row)
            .optional()?
            .ok_or_else(|| StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            })
    }

    fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let sql = format!("{SELECT_HABITS} ORDER BY h.created_at, h.title");
        self.query_habits(&sql, [])
    }

    fn possible_habits(&self, date: NaiveDate) -> Result<Vec<Habit>, StorageError> {
        let sql = format!(
            "{SELECT_HABITS}
             WHERE h.created_at <= ?1
               AND EXISTS (
                   SELECT 1 FROM habit_week_days w
                   WHERE w.habit_id = h.id AND w.week_day = ?2
               )
             ORDER BY h.created_at, h.title"
        );

        self.query_habits(
            &sql,
            params![
                date.format(dates::DATE_FORMAT).to_string(),
                WeekDay::of(date).index()
            ],
        )
    }

    fn find_day(&self, date: NaiveDate) -> Result<Option<Day>, StorageError> {
        let day = self
            .conn
            .query_row(
                "SELECT id, date FROM days WHERE date = ?1",
                params![date.format(dates::DATE_FORMAT).to_string()],
                day_from_row,
            )
            .optional()?;
        Ok(day)
    }

    fn completed_habit_ids(&self, day_id: &DayId) -> Result<Vec<HabitId>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT habit_id FROM day_habits WHERE day_id = ?1 ORDER BY id")?;

        let ids = stmt
            .query_map(params![day_id.to_string()], |row| {
                let id_str: String = row.get(0)?;
                HabitId::from_string(&id_str).map_err(|_| invalid_column(0, "Invalid UUID"))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// The UNIQUE constraint on `days.date` makes this a single get-or-insert
    /// even when two callers race for the same date.
    fn get_or_create_day(&self, date: NaiveDate) -> Result<Day, StorageError> {
        let candidate = Day::new(date);
        let date_str = date.format(dates::DATE_FORMAT).to_string();

        let inserted = self.conn.execute(
            "INSERT INTO days (id, date) VALUES (?1, ?2) ON CONFLICT (date) DO NOTHING",
            params![candidate.id.to_string(), date_str],
        )?;
        if inserted > 0 {
            tracing::debug!("Materialized day {}", date_str);
            return Ok(candidate);
        }

        let day = self.conn.query_row(
            "SELECT id, date FROM days WHERE date = ?1",
            params![date_str],
            day_from_row,
        )?;
        Ok(day)
    }

    fn toggle_completion(
        &self,
        date: NaiveDate,
        habit_id: &HabitId,
    ) -> Result<Completion, StorageError> {
        // Statements on `self.conn` run inside this transaction until it ends
        let tx = self.conn.unchecked_transaction()?;
        let day = self.get_or_create_day(date)?;

        let removed = tx.execute(
            "DELETE FROM day_habits WHERE day_id = ?1 AND habit_id = ?2",
            params![day.id.to_string(), habit_id.to_string()],
        )?;

        let completion = if removed > 0 {
            Completion::Cleared
        } else {
            tx.execute(
                "INSERT INTO day_habits (day_id, habit_id) VALUES (?1, ?2)",
                params![day.id.to_string(), habit_id.to_string()],
            )?;
            Completion::Completed
        };

        tx.commit()?;

        tracing::debug!("Toggled habit {} on {}: {:?}", habit_id, day.date, completion);
        Ok(completion)
    }

    fn summary(&self) -> Result<Vec<DaySummary>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT d.id, d.date,
                (
                    SELECT CAST(COUNT(*) AS REAL)
                    FROM day_habits dh
                    WHERE dh.day_id = d.id
                ) AS completed,
                (
                    SELECT CAST(COUNT(*) AS REAL)
                    FROM habit_week_days hwd
                    JOIN habits h ON h.id = hwd.habit_id
                    WHERE hwd.week_day = CAST(strftime('%w', d.date) AS INTEGER)
                      AND h.created_at <= d.date
                ) AS amount
             FROM days d
             ORDER BY d.date",
        )?;

        let rows = stmt
            .query_map([], |row| {
                let day = day_from_row(row)?;
                Ok(DaySummary {
                    id: day.id,
                    date: day.date,
                    completed: row.get(2)?,
                    amount: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
