//! Storage layer for persisting habit data
//!
//! This module handles all database operations using SQLite. It provides
//! a narrow interface for storing habits and their weekdays, materializing
//! days, toggling completions, and running the summary aggregate.

pub mod schema;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Completion, Day, DayId, DaySummary, Habit, HabitId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },
}

/// Trait defining the storage interface for habits and days
///
/// Every method is a short sequence of statements; callers never see a
/// partially applied write.
pub trait HabitStorage {
    /// Insert a habit together with its weekdays
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// List every habit, oldest first
    fn list_habits(&self) -> Result<Vec<Habit>, StorageError>;

    /// Habits created on or before `date` that recur on its weekday
    fn possible_habits(&self, date: NaiveDate) -> Result<Vec<Habit>, StorageError>;

    /// Look up the materialized day for a date, if any
    fn find_day(&self, date: NaiveDate) -> Result<Option<Day>, StorageError>;

    /// IDs of the habits completed on a day
    fn completed_habit_ids(&self, day_id: &DayId) -> Result<Vec<HabitId>, StorageError>;

    /// Get the day for `date`, creating it if it doesn't exist yet
    fn get_or_create_day(&self, date: NaiveDate) -> Result<Day, StorageError>;

    /// Flip the completion of a habit on `date`, materializing the day as needed
    fn toggle_completion(
        &self,
        date: NaiveDate,
        habit_id: &HabitId,
    ) -> Result<Completion, StorageError>;

    /// Completed and possible counts for every materialized day
    fn summary(&self) -> Result<Vec<DaySummary>, StorageError>;
}
