use crate::error::{ApiError, ErrorResponse};
use crate::models::{ListQuery, ServicePathConfigs};
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};

/// GET /service_paths handler - List configuration entries
///
/// Query parameters:
/// - path: Service path to list (optional, default: `/`)
/// - recursive: Include every service path nested below `path` (optional, default: false)
#[utoipa::path(
    get,
    path = routes::SERVICE_PATHS,
    params(ListQuery),
    responses(
        (status = 200, description = "Entries keyed by service path, then by key", body = serde_json::Value),
        (status = 400, description = "Invalid query parameter", body = ErrorResponse)
    ),
    tag = "service_paths"
)]
pub async fn list_handler(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<(StatusCode, Json<ServicePathConfigs>), ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::InvalidQueryParam(rejection.body_text()))?;

    let path = query
        .path
        .as_deref()
        .filter(|path| !path.is_empty())
        .unwrap_or("/");
    let recursive = query.recursive.unwrap_or(false);

    let listing = state.store.path_read(path, recursive).await;

    tracing::info!(
        "Listed {} service paths (path: {}, recursive: {})",
        listing.len(),
        path,
        recursive
    );

    Ok((StatusCode::OK, Json(listing)))
}
