//! Day records, completions and the read models built on top of them
//!
//! A `Day` is materialized the first time any habit is toggled for a date.
//! Completions (day/habit pairs) hang off a day; their presence means the
//! habit was done that day.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{dates, DayId, Habit, HabitId};

/// A calendar date that has at least been touched by a toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    pub id: DayId,
    pub date: NaiveDate,
}

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: DayId::new(),
            date,
        }
    }
}

/// Result of flipping a habit's completion for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The habit was not completed and now is
    Completed,
    /// The habit was completed and no longer is
    Cleared,
}

/// Everything a client needs to render a single date
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    /// Habits that exist by this date and recur on its weekday
    pub possible_habit: Vec<Habit>,
    /// Habits completed that day; absent when the day was never materialized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_habits: Option<Vec<HabitId>>,
}

/// Completion ratio of one materialized day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub id: DayId,
    #[serde(serialize_with = "dates::serialize_midnight")]
    pub date: NaiveDate,
    /// Number of habits completed that day
    pub completed: f64,
    /// Number of habits that were possible that day
    pub amount: f64,
}
