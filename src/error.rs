use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Error type for the reference backend's endpoints
///
/// Maps each failure to an HTTP status code and a JSON [`ErrorResponse`].
#[derive(Debug)]
pub enum ApiError {
    /// Key does not exist under the service path
    KeyNotFound { path: String, key: String },
    /// Required field was missing or empty
    MissingField(&'static str),
    /// Invalid query parameter
    InvalidQueryParam(String),
    /// JSON parsing error
    JsonError(serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::KeyNotFound { path, key } => (
                StatusCode::NOT_FOUND,
                format!("Key not found: {} under {}", key, path),
            ),
            ApiError::MissingField(field) => (
                StatusCode::BAD_REQUEST,
                format!("Missing required field: {}", field),
            ),
            ApiError::InvalidQueryParam(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid query parameter: {}", msg),
            ),
            ApiError::JsonError(err) => (
                StatusCode::BAD_REQUEST,
                format!("JSON parse error: {}", err),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::JsonError(err)
    }
}
