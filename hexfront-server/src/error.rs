//! API error responses

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hexfront_core::{ActionError, GameError};
use serde_json::json;

/// Error returned by a handler
#[derive(Debug)]
pub enum ApiError {
    /// Action rejected by the engine; state unchanged
    Rejected(ActionError),
    /// Malformed request
    BadRequest(String),
    /// Game could not be set up
    Setup(GameError),
}

impl From<ActionError> for ApiError {
    fn from(e: ActionError) -> Self {
        match e {
            ActionError::OutOfBounds(_) => ApiError::BadRequest(e.to_string()),
            other => ApiError::Rejected(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl From<GameError> for ApiError {
    fn from(e: GameError) -> Self {
        ApiError::Setup(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Rejected(e) => (StatusCode::CONFLICT, e.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Setup(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
