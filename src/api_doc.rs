use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse};
use crate::handlers;
use crate::models::{DeleteKeysRequest, WriteKeyRequest};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "confman API",
        version = "1.0.0",
        description = "Hierarchical configuration entries grouped under service paths"
    ),
    paths(
        handlers::health::health_handler,
        handlers::list::list_handler,
        handlers::read_key::read_key_handler,
        handlers::write_key::write_key_handler,
        handlers::delete_keys::delete_keys_handler
    ),
    components(
        schemas(
            WriteKeyRequest,
            DeleteKeysRequest,
            ErrorResponse,
            HealthResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "service_paths", description = "Configuration entry operations")
    )
)]
pub struct ApiDoc;
