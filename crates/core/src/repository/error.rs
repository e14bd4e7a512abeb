//! Repository error taxonomy.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::store::StoreError;

/// Coarse failure category surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NetworkFailure,
    RemoteFormatFailure,
    NotFound,
    StorageFailure,
    InvalidRequest,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NetworkFailure => "network_failure",
            ErrorKind::RemoteFormatFailure => "remote_format_failure",
            ErrorKind::NotFound => "not_found",
            ErrorKind::StorageFailure => "storage_failure",
            ErrorKind::InvalidRequest => "invalid_request",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`super::PhotoRepository`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The remote catalog could not be reached or refused the request.
    #[error("Remote catalog unavailable: {0}")]
    Network(#[source] CatalogError),

    /// The remote catalog answered with something we could not parse.
    #[error("Unexpected remote response: {0}")]
    RemoteFormat(#[source] CatalogError),

    /// The remote catalog has no such photo.
    #[error("Photo not found: {0}")]
    NotFound(#[source] CatalogError),

    /// Local persistence failed.
    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),

    /// The caller asked for something that can never succeed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::Network(_) => ErrorKind::NetworkFailure,
            RepositoryError::RemoteFormat(_) => ErrorKind::RemoteFormatFailure,
            RepositoryError::NotFound(_) => ErrorKind::NotFound,
            RepositoryError::Storage(_) => ErrorKind::StorageFailure,
            RepositoryError::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }
}

impl From<CatalogError> for RepositoryError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Format(_) => RepositoryError::RemoteFormat(e),
            CatalogError::NotFound(_) => RepositoryError::NotFound(e),
            CatalogError::Network(_)
            | CatalogError::Api { .. }
            | CatalogError::RateLimitExceeded
            | CatalogError::NotConfigured(_) => RepositoryError::Network(e),
        }
    }
}
