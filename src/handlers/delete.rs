use crate::error::ApiError;
use crate::routes;
use crate::state::AppState;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// DELETE /:key - Remove the record
#[utoipa::path(
    delete,
    path = routes::RECORD,
    params(
        ("key" = String, Path, description = "Record key")
    ),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "No record under this key"),
        (status = 500, description = "Store unavailable")
    ),
    tag = "records"
)]
pub async fn delete_record(state: &AppState, key: &str) -> Result<Response, ApiError> {
    match state.store.delete(key).await {
        Ok(()) => {
            tracing::info!("Deleted record: {}", key);
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        Err(StoreError::NotFound) => {
            tracing::debug!("Nothing to delete for key: {}", key);
            Err(ApiError::NotFound)
        }
        Err(err) => Err(ApiError::StoreDelete(err)),
    }
}
