//! JSON error responses.

use axum::{http::StatusCode, Json};
use photocache_core::{ErrorKind, RepositoryError};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// HTTP status for a repository failure.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NetworkFailure | ErrorKind::RemoteFormatFailure => StatusCode::BAD_GATEWAY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
    }
}

pub fn repository_error(e: RepositoryError) -> ApiError {
    let kind = e.kind();
    if kind == ErrorKind::StorageFailure {
        error!("Storage failure while handling request: {}", e);
    }
    (
        status_for(kind),
        Json(ErrorResponse {
            error: e.to_string(),
            kind: kind.as_str().to_string(),
        }),
    )
}

pub fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
            kind: ErrorKind::InvalidRequest.as_str().to_string(),
        }),
    )
}
