use crate::error::ApiError;
use crate::handlers::update_record;
use crate::models::{MessageResponse, ServerInfoQuery};
use crate::routes;
use crate::state::AppState;
use crate::store::StoreError;
use axum::response::Response;

/// POST /:key - Create the record unless the key is already taken
///
/// The existence check and the write are two separate store calls, so two
/// creators racing on the same absent key can both succeed; the later write
/// wins.
#[utoipa::path(
    post,
    path = routes::RECORD,
    params(
        ("key" = String, Path, description = "Record key"),
        ServerInfoQuery
    ),
    responses(
        (status = 204, description = "Record created"),
        (status = 400, description = "Malformed query string", body = crate::error::ErrorResponse),
        (status = 403, description = "Record already exists", body = MessageResponse),
        (status = 404, description = "No usable key in path"),
        (status = 500, description = "Serialization or store failure")
    ),
    tag = "records"
)]
pub async fn create_record(
    state: &AppState,
    key: &str,
    query: ServerInfoQuery,
) -> Result<Response, ApiError> {
    match state.store.get(key).await {
        Ok(_) => {
            tracing::info!("POST conflict, record already exists: {}", key);
            Err(ApiError::AlreadyExists)
        }
        Err(StoreError::NotFound) => update_record(state, key, query).await,
        Err(err) => Err(ApiError::StoreRead(err)),
    }
}
