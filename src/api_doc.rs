use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use crate::models::{MessageResponse, ServerInfo};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "server-registry API",
        version = "1.0.0",
        description = "Endpoint records (api, ws, grpc) kept in memcached, addressed by path key"
    ),
    paths(
        handlers::get::get_record,
        handlers::create::create_record,
        handlers::update::update_record,
        handlers::delete::delete_record
    ),
    components(
        schemas(
            ServerInfo,
            MessageResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "records", description = "Endpoint record operations")
    )
)]
pub struct ApiDoc;
