use crate::error::{ApiError, ErrorResponse};
use crate::models::ReadKeyQuery;
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};

/// GET /service_paths/key handler - Read a single value
///
/// The value is returned as a JSON string.
#[utoipa::path(
    get,
    path = routes::SERVICE_PATH_KEY,
    params(ReadKeyQuery),
    responses(
        (status = 200, description = "Value found", body = String),
        (status = 400, description = "Missing or empty query parameter", body = ErrorResponse),
        (status = 404, description = "Key not found", body = ErrorResponse)
    ),
    tag = "service_paths"
)]
pub async fn read_key_handler(
    State(state): State<AppState>,
    query: Result<Query<ReadKeyQuery>, QueryRejection>,
) -> Result<(StatusCode, Json<String>), ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::InvalidQueryParam(rejection.body_text()))?;

    if query.service_path.is_empty() {
        return Err(ApiError::MissingField("service-path"));
    }
    if query.key.is_empty() {
        return Err(ApiError::MissingField("key"));
    }

    match state.store.read(&query.service_path, &query.key).await {
        Some(value) => {
            tracing::info!("Read key {} under {}", query.key, query.service_path);
            Ok((StatusCode::OK, Json(value)))
        }
        None => {
            tracing::info!("Key {} not found under {}", query.key, query.service_path);
            Err(ApiError::KeyNotFound {
                path: query.service_path,
                key: query.key,
            })
        }
    }
}
