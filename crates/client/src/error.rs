//! Client error types.

use fanclub_cache::CoordinatorError;
use fanclub_core::cache::StorageError;
use fanclub_core::fetch::FetchError;
use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Cache storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Cache action failed: {0}")]
    Cache(#[from] CoordinatorError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ClientError> for FetchError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ServerError { status, message } => FetchError::Status { status, message },
            ClientError::NotFound { resource } => FetchError::NotFound { resource },
            ClientError::InvalidResponse(reason) => FetchError::InvalidResponse(reason),
            ClientError::Json(err) => FetchError::InvalidResponse(err.to_string()),
            ClientError::Fetch(err) => err,
            other => FetchError::Request(other.to_string()),
        }
    }
}
