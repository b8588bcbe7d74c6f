//! Habit entity and related functionality
//!
//! This module defines the core Habit struct that represents something the user
//! wants to do on a recurring set of weekdays, along with its validation rules.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{dates, DomainError, HabitId, WeekDay};

/// Longest title a habit may have, in characters
pub const MAX_TITLE_LEN: usize = 100;

/// A habit represents something the user wants to do regularly
///
/// Each habit has a title, the day it was created, and the weekdays it recurs
/// on. Habits are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Run", "Read for 30min")
    pub title: String,
    /// The day this habit was created
    #[serde(serialize_with = "dates::serialize_midnight")]
    pub created_at: NaiveDate,
    /// Weekdays this habit recurs on, ascending and without duplicates
    pub week_days: Vec<WeekDay>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// The title is trimmed and the weekdays are sorted and de-duplicated.
    pub fn new(
        title: String,
        week_days: impl IntoIterator<Item = WeekDay>,
        created_at: NaiveDate,
    ) -> Result<Self, DomainError> {
        let title = Self::validate_title(&title)?;

        let week_days: BTreeSet<WeekDay> = week_days.into_iter().collect();

        Ok(Self {
            id: HabitId::new(),
            title,
            created_at,
            week_days: week_days.into_iter().collect(),
        })
    }

    /// Create a habit from existing data (used when loading from database)
    ///
    /// This constructor assumes data is already validated.
    pub fn from_existing(
        id: HabitId,
        title: String,
        created_at: NaiveDate,
        week_days: Vec<WeekDay>,
    ) -> Self {
        Self {
            id,
            title,
            created_at,
            week_days,
        }
    }

    /// Whether this habit recurs on the given weekday
    pub fn recurs_on(&self, week_day: WeekDay) -> bool {
        self.week_days.contains(&week_day)
    }

    /// Whether this habit counts as possible on `date`
    ///
    /// A habit is possible once it exists and the date falls on one of its
    /// weekdays.
    pub fn is_possible_on(&self, date: NaiveDate) -> bool {
        self.created_at <= date && self.recurs_on(WeekDay::of(date))
    }

    /// Check a title and return it trimmed
    ///
    /// Titles must be non-empty after trimming and at most
    /// [`MAX_TITLE_LEN`] characters long.
    pub fn validate_title(title: &str) -> Result<String, DomainError> {
        let title = title.trim();

        if title.is_empty() {
            return Err(DomainError::InvalidHabitTitle(
                "Habit title cannot be empty".to_string(),
            ));
        }

        if title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::InvalidHabitTitle(format!(
                "Habit title cannot be longer than {MAX_TITLE_LEN} characters"
            )));
        }

        Ok(title.to_string())
    }
}
