use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::actions;
use crate::api::{error::ApiError, AppState};
use crate::domain::{DaySummary, DayView, Habit};
use crate::validation;

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    date: Option<String>,
}

pub async fn list_habits_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Habit>>, ApiError> {
    let storage = state.lock_storage()?;
    Ok(Json(actions::list_habits(&*storage)?))
}

pub async fn create_habit_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let body = validation::parse_create_habit(&body)?;

    let storage = state.lock_storage()?;
    actions::create_habit(&*storage, body, state.clock.today())?;

    Ok(StatusCode::OK)
}

pub async fn day_handler(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<DayView>, ApiError> {
    let date = validation::parse_day_date(query.date.as_deref())?;

    let storage = state.lock_storage()?;
    Ok(Json(actions::day_view(&*storage, date)?))
}

pub async fn toggle_habit_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let habit_id = validation::parse_habit_id(&id)?;

    let storage = state.lock_storage()?;
    actions::toggle_habit(&*storage, &habit_id, state.clock.today())?;

    Ok(StatusCode::OK)
}

pub async fn summary_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<DaySummary>>, ApiError> {
    let storage = state.lock_storage()?;
    Ok(Json(actions::summary(&*storage)?))
}
