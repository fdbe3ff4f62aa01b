use crate::error::ApiError;
use crate::models::ServerInfo;
use crate::routes;
use crate::state::AppState;
use crate::store::StoreError;
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// GET /:key - Return the stored record verbatim
#[utoipa::path(
    get,
    path = routes::RECORD,
    params(
        ("key" = String, Path, description = "Record key")
    ),
    responses(
        (status = 200, description = "Record found", body = ServerInfo, content_type = "application/json"),
        (status = 404, description = "No record under this key"),
        (status = 500, description = "Store unavailable")
    ),
    tag = "records"
)]
pub async fn get_record(state: &AppState, key: &str) -> Result<Response, ApiError> {
    match state.store.get(key).await {
        Ok(payload) => {
            tracing::debug!("Read record: {}", key);
            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                payload,
            )
                .into_response())
        }
        Err(StoreError::NotFound) => {
            tracing::debug!("Record not found: {}", key);
            Err(ApiError::NotFound)
        }
        Err(err) => Err(ApiError::StoreRead(err)),
    }
}
