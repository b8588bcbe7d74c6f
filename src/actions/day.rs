//! Read-only views over days: a single date and the overall summary

use chrono::NaiveDate;

use crate::actions::ActionError;
use crate::domain::{DaySummary, DayView};
use crate::storage::HabitStorage;

/// Possible and completed habits for one date
///
/// A date that was never toggled has no day row; its completions are reported
/// as absent rather than as an error.
pub fn day_view<S: HabitStorage>(storage: &S, date: NaiveDate) -> Result<DayView, ActionError> {
    let possible_habit = storage.possible_habits(date)?;

    let completed_habits = match storage.find_day(date)? {
        Some(day) => Some(storage.completed_habit_ids(&day.id)?),
        None => None,
    };

    Ok(DayView {
        possible_habit,
        completed_habits,
    })
}

/// Completion ratio of every materialized day
pub fn summary<S: HabitStorage>(storage: &S) -> Result<Vec<DaySummary>, ActionError> {
    Ok(storage.summary()?)
}
