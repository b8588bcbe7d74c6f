use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::actions::ActionError;
use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Everything a handler can fail with, mapped onto HTTP status codes
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("Storage lock poisoned")]
    StoreUnavailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Validation error", "issues": err.issues })),
            )
                .into_response(),
            ApiError::Action(ActionError::Domain(err)) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": err.to_string() })),
            )
                .into_response(),
            ApiError::Action(ActionError::Storage(err @ StorageError::HabitNotFound { .. })) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": err.to_string() })),
            )
                .into_response(),
            other => {
                error!("Request failed: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
