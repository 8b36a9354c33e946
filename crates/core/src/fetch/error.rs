use thiserror::Error;

/// Errors raised by a network fetch. These are always surfaced to the caller
/// and never cached.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let error = FetchError::Status {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(error.to_string(), "Server returned 503: maintenance");
    }

    #[test]
    fn test_not_found_display() {
        let error = FetchError::NotFound {
            resource: "/api/clubs".to_string(),
        };
        assert_eq!(error.to_string(), "Resource not found: /api/clubs");
    }
}
