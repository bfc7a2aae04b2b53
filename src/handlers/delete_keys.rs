use crate::error::{ApiError, ErrorResponse};
use crate::models::DeleteKeysRequest;
use crate::routes;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode};

/// DELETE /service_paths/keys handler - Remove a batch of keys from one service path
///
/// Keys that do not exist are ignored.
#[utoipa::path(
    delete,
    path = routes::SERVICE_PATH_KEYS,
    request_body = DeleteKeysRequest,
    responses(
        (status = 200, description = "Keys removed"),
        (status = 400, description = "Empty path or key list, or invalid JSON", body = ErrorResponse)
    ),
    tag = "service_paths"
)]
pub async fn delete_keys_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let request: DeleteKeysRequest = serde_json::from_slice(&body)?;

    if request.path.is_empty() {
        return Err(ApiError::MissingField("path"));
    }
    if request.keys.is_empty() {
        return Err(ApiError::MissingField("keys"));
    }

    let removed = state.store.delete_keys(&request.path, &request.keys).await;

    tracing::info!(
        "Deleted {} of {} requested keys under {}",
        removed,
        request.keys.len(),
        request.path
    );
    Ok(StatusCode::OK)
}
