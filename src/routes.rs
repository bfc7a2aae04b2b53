// Route path constants - single source of truth for all API paths

use axum::{
    http::{header, Method},
    routing::{delete, get},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;

pub const HEALTH: &str = "/health";
pub const SERVICE_PATHS: &str = "/service_paths";
pub const SERVICE_PATH_KEY: &str = "/service_paths/key";
pub const SERVICE_PATH_KEYS: &str = "/service_paths/keys";

/// Browser front ends call the backend from another origin
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Build the reference backend router with request tracing, CORS and API docs
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(HEALTH, get(handlers::health_handler))
        .route(SERVICE_PATHS, get(handlers::list_handler))
        .route(
            SERVICE_PATH_KEY,
            get(handlers::read_key_handler).put(handlers::write_key_handler),
        )
        .route(SERVICE_PATH_KEYS, delete(handlers::delete_keys_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::test_app;
    use crate::store::MemoryStore;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_preflight_allows_cross_origin_writes() {
        let app = test_app(MemoryStore::new());

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/service_paths/key")
                    .header(header::ORIGIN, "http://ui.example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
        for method in ["GET", "PUT", "DELETE", "OPTIONS"] {
            assert!(methods.contains(method), "{method} missing from {methods}");
        }

        let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(allowed.contains("authorization"));
        assert!(allowed.contains("content-type"));
    }

    #[tokio::test]
    async fn test_simple_request_carries_allow_origin() {
        let app = test_app(MemoryStore::new());

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .header(header::ORIGIN, "http://ui.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
