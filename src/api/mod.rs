//! HTTP surface of the tracker
//!
//! Handlers validate the request, lock the store, run one action and shape
//! the response. Shared state is only the store handle and the clock.

pub mod error;
pub mod routes;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, patch, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::domain::dates;
use crate::storage::SqliteStorage;
use error::ApiError;
use routes::{
    create_habit_handler, day_handler, list_habits_handler, summary_handler,
    toggle_habit_handler,
};

/// Source of "today" for creation dates and toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// The current UTC date
    System,
    /// Always the given date
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => dates::normalize(Utc::now()),
            Clock::Fixed(date) => *date,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    storage: Arc<Mutex<SqliteStorage>>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(storage: SqliteStorage, clock: Clock) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
            clock,
        }
    }

    pub fn lock_storage(&self) -> Result<MutexGuard<'_, SqliteStorage>, ApiError> {
        self.storage.lock().map_err(|_| ApiError::StoreUnavailable)
    }
}

/// Build the application router with CORS and request tracing
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(list_habits_handler))
        .route("/habit", post(create_habit_handler))
        .route("/habit/{id}/toggle", patch(toggle_habit_handler))
        .route("/day", get(day_handler))
        .route("/summary", get(summary_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
