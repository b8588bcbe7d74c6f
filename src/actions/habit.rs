//! Creating, listing and toggling habits

use chrono::NaiveDate;

use crate::actions::ActionError;
use crate::domain::{Completion, Habit, HabitId};
use crate::storage::HabitStorage;
use crate::validation::CreateHabitBody;

/// Create a new habit, dated `today`
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    body: CreateHabitBody,
    today: NaiveDate,
) -> Result<Habit, ActionError> {
    let habit = Habit::new(body.title, body.week_days, today)?;

    storage.create_habit(&habit)?;

    tracing::info!("Created habit '{}' ({})", habit.title, habit.id);
    Ok(habit)
}

/// List every habit
pub fn list_habits<S: HabitStorage>(storage: &S) -> Result<Vec<Habit>, ActionError> {
    Ok(storage.list_habits()?)
}

/// Flip today's completion of a habit
///
/// The habit must exist, but it is not required to be possible today.
pub fn toggle_habit<S: HabitStorage>(
    storage: &S,
    habit_id: &HabitId,
    today: NaiveDate,
) -> Result<Completion, ActionError> {
    // Verify habit exists
    storage.get_habit(habit_id)?;

    let completion = storage.toggle_completion(today, habit_id)?;

    tracing::info!("Habit {} {:?} for {}", habit_id, completion, today);
    Ok(completion)
}
