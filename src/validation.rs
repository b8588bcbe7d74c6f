//! Request validation
//!
//! Untrusted input is checked against a fixed shape here, before anything
//! touches the store. Each parser returns either the typed value or a
//! `ValidationError` listing every field that failed.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{dates, DomainError, Habit, HabitId, WeekDay};

/// A single failed check, addressed by its field path (e.g. `weekDays[2]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

/// Every problem found while validating one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![ValidationIssue {
                path: path.into(),
                message: message.into(),
            }],
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        for (i, issue) in self.issues.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            if issue.path.is_empty() {
                write!(f, "{sep}{}", issue.message)?;
            } else {
                write!(f, "{sep}{}: {}", issue.path, issue.message)?;
            }
        }
        Ok(())
    }
}

/// Collects issues while walking a request
#[derive(Default)]
struct Issues(Vec<ValidationIssue>);

impl Issues {
    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationError> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(ValidationError { issues: self.0 })
        }
    }
}

/// Validated body of a create-habit request
#[derive(Debug, Clone, PartialEq)]
pub struct CreateHabitBody {
    pub title: String,
    pub week_days: Vec<WeekDay>,
}

/// Validate a raw `{title, weekDays}` JSON body
pub fn parse_create_habit(body: &[u8]) -> Result<CreateHabitBody, ValidationError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ValidationError::single("", format!("Invalid JSON: {e}")))?;

    let Value::Object(object) = value else {
        return Err(ValidationError::single("", "Expected an object"));
    };

    let mut issues = Issues::default();
    let title = title_field(&object, &mut issues);
    let week_days = week_days_field(&object, &mut issues);

    issues.finish(|| CreateHabitBody { title, week_days })
}

fn title_field(object: &Map<String, Value>, issues: &mut Issues) -> String {
    match object.get("title") {
        None | Some(Value::Null) => issues.push("title", "Required"),
        Some(Value::String(title)) => match Habit::validate_title(title) {
            Ok(title) => return title,
            Err(DomainError::InvalidHabitTitle(message)) => issues.push("title", message),
            Err(other) => issues.push("title", other.to_string()),
        },
        Some(other) => issues.push("title", format!("Expected string, received {}", kind(other))),
    }
    String::new()
}

fn week_days_field(object: &Map<String, Value>, issues: &mut Issues) -> Vec<WeekDay> {
    let items = match object.get("weekDays") {
        None | Some(Value::Null) => {
            issues.push("weekDays", "Required");
            return Vec::new();
        }
        Some(Value::Array(items)) => items,
        Some(other) => {
            issues.push("weekDays", format!("Expected array, received {}", kind(other)));
            return Vec::new();
        }
    };

    let mut week_days = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let path = format!("weekDays[{i}]");
        let Value::Number(number) = item else {
            issues.push(path, format!("Expected number, received {}", kind(item)));
            continue;
        };

        match integer(number) {
            Some(index) => match WeekDay::new(index) {
                Ok(week_day) => week_days.push(week_day),
                Err(_) => issues.push(path, "Must be between 0 and 6"),
            },
            None => issues.push(path, "Expected integer"),
        }
    }
    week_days
}

/// An integral JSON number, accepting `3.0` but not `3.5`
fn integer(number: &serde_json::Number) -> Option<i64> {
    if let Some(i) = number.as_i64() {
        return Some(i);
    }
    number
        .as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
        .map(|f| f as i64)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate the `date` query parameter of a day query
pub fn parse_day_date(date: Option<&str>) -> Result<NaiveDate, ValidationError> {
    let raw = date.ok_or_else(|| ValidationError::single("date", "Required"))?;
    dates::coerce(raw).ok_or_else(|| ValidationError::single("date", "Invalid date"))
}

/// Validate a habit ID taken from the request path
pub fn parse_habit_id(raw: &str) -> Result<HabitId, ValidationError> {
    HabitId::from_string(raw.trim()).map_err(|_| ValidationError::single("id", "Invalid uuid"))
}
