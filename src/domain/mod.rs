//! Domain module containing core business logic and data types
//!
//! This module defines the core entities (Habit, Day) and their validation
//! rules, plus the date helpers every layer uses to work at day granularity.

pub mod dates;
pub mod day;
pub mod habit;
pub mod types;

// Re-export public types for easy access
pub use day::*;
pub use habit::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid habit title: {0}")]
    InvalidHabitTitle(String),

    #[error("Invalid week day {0}: must be between 0 and 6")]
    InvalidWeekDay(i64),
}
