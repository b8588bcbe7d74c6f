//! Core identifier and value types used throughout the domain layer
//!
//! This module defines the ID wrappers and the `WeekDay` value type that are
//! used by Habit, Day, and the storage layer.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety - you can't accidentally
/// pass a habit ID where a day ID is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a habit ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a materialized day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayId(pub Uuid);

impl DayId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for DayId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A day of the week, numbered 0 (Sunday) through 6 (Saturday)
///
/// The numbering matches SQLite's `strftime('%w', ...)` so the same value can
/// be compared in Rust and inside SQL queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct WeekDay(u8);

impl WeekDay {
    pub const SUNDAY: WeekDay = WeekDay(0);
    pub const SATURDAY: WeekDay = WeekDay(6);

    /// Build a weekday from its numeric index, rejecting anything outside 0-6
    pub fn new(index: i64) -> Result<Self, DomainError> {
        if !(0..=6).contains(&index) {
            return Err(DomainError::InvalidWeekDay(index));
        }
        Ok(Self(index as u8))
    }

    /// The weekday a calendar date falls on
    pub fn of(date: NaiveDate) -> Self {
        Self(date.weekday().num_days_from_sunday() as u8)
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for WeekDay {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WeekDay> for u8 {
    fn from(day: WeekDay) -> Self {
        day.0
    }
}

impl fmt::Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
