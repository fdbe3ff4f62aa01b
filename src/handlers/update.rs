use crate::error::ApiError;
use crate::models::{ServerInfo, ServerInfoQuery};
use crate::routes;
use crate::state::AppState;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// PATCH /:key - Replace (or create) the record from query parameters
///
/// All three fields are written every time; a missing parameter stores an
/// empty string rather than keeping the previous value.
#[utoipa::path(
    patch,
    path = routes::RECORD,
    params(
        ("key" = String, Path, description = "Record key"),
        ServerInfoQuery
    ),
    responses(
        (status = 204, description = "Record stored"),
        (status = 400, description = "Malformed query string", body = crate::error::ErrorResponse),
        (status = 404, description = "No usable key in path"),
        (status = 500, description = "Serialization or store failure")
    ),
    tag = "records"
)]
pub async fn update_record(
    state: &AppState,
    key: &str,
    query: ServerInfoQuery,
) -> Result<Response, ApiError> {
    let info = ServerInfo::from(query);
    let payload = serde_json::to_vec(&info)?;

    state
        .store
        .set(key, payload)
        .await
        .map_err(ApiError::StoreWrite)?;

    tracing::info!("Stored record: {}", key);
    Ok(StatusCode::NO_CONTENT.into_response())
}
