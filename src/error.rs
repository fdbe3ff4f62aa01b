use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::models::{MessageResponse, RECORD_EXISTS_MESSAGE};
use crate::store::StoreError;

/// Methods the record router answers
pub const ALLOWED_METHODS: &str = "GET, POST, PATCH, DELETE";

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Every non-success outcome of a record request.
///
/// Handlers return these as values; `into_response` is the single place that
/// maps them to status codes. Only `AlreadyExists` and `InvalidQuery` carry a
/// body; everything else is status-only.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No usable key in the path, or no record under it
    #[error("record not found")]
    NotFound,
    /// Method outside GET/POST/PATCH/DELETE
    #[error("method not allowed")]
    MethodNotAllowed,
    /// POST against a key that already holds a record
    #[error("record already exists")]
    AlreadyExists,
    /// Query string could not be mapped onto the record fields
    #[error("invalid query string: {0}")]
    InvalidQuery(String),
    #[error("failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to read record from store: {0}")]
    StoreRead(StoreError),
    #[error("failed to write record to store: {0}")]
    StoreWrite(StoreError),
    #[error("failed to delete record from store: {0}")]
    StoreDelete(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, ALLOWED_METHODS)],
            )
                .into_response(),
            ApiError::AlreadyExists => (
                StatusCode::FORBIDDEN,
                Json(MessageResponse {
                    message: RECORD_EXISTS_MESSAGE.to_string(),
                }),
            )
                .into_response(),
            ApiError::InvalidQuery(_) => {
                let body = Json(ErrorResponse {
                    error: self.to_string(),
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Serialization(_)
            | ApiError::StoreRead(_)
            | ApiError::StoreWrite(_)
            | ApiError::StoreDelete(_) => {
                tracing::error!("{}", self);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery(rejection.body_text())
    }
}
