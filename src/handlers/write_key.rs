use crate::error::{ApiError, ErrorResponse};
use crate::models::WriteKeyRequest;
use crate::routes;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode};

/// PUT /service_paths/key handler - Create or overwrite a single value
#[utoipa::path(
    put,
    path = routes::SERVICE_PATH_KEY,
    request_body = WriteKeyRequest,
    responses(
        (status = 200, description = "Value stored"),
        (status = 400, description = "Empty path or key, or invalid JSON", body = ErrorResponse)
    ),
    tag = "service_paths"
)]
pub async fn write_key_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let request: WriteKeyRequest = serde_json::from_slice(&body)?;

    if request.path.is_empty() {
        return Err(ApiError::MissingField("path"));
    }
    if request.key.is_empty() {
        return Err(ApiError::MissingField("key"));
    }

    state.store.write(&request.path, &request.key, &request.value).await;

    tracing::info!("Wrote key {} under {}", request.key, request.path);
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::test_app;
    use crate::store::MemoryStore;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    fn put_request(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri("/service_paths/key")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    #[tokio::test]
    async fn test_write_key_endpoint_success() {
        let store = MemoryStore::new();
        let app = test_app(store.clone());

        let request = serde_json::json!({"path": "/svc/a", "key": "k1", "value": "v2"});
        let response = app
            .oneshot(put_request(serde_json::to_string(&request).unwrap()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.read("/svc/a", "k1").await, Some("v2".to_string()));
    }

    #[tokio::test]
    async fn test_write_key_endpoint_overwrites() {
        let store = MemoryStore::new();
        store.write("/svc/a", "k1", "v1").await;
        let app = test_app(store.clone());

        let request = serde_json::json!({"path": "/svc/a", "key": "k1", "value": "v2"});
        let response = app
            .oneshot(put_request(serde_json::to_string(&request).unwrap()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.read("/svc/a", "k1").await, Some("v2".to_string()));
    }

    #[tokio::test]
    async fn test_write_key_endpoint_empty_key() {
        let store = MemoryStore::new();
        let app = test_app(store.clone());

        let request = serde_json::json!({"path": "/svc/a", "key": "", "value": "v"});
        let response = app
            .oneshot(put_request(serde_json::to_string(&request).unwrap()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error_response.error.contains("key"));
        assert!(store.path_read("/", true).await.is_empty());
    }

    #[tokio::test]
    async fn test_write_key_endpoint_invalid_json() {
        let app = test_app(MemoryStore::new());

        let response = app.oneshot(put_request("{invalid json}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error_response.error.contains("JSON parse error"));
    }
}
