use thiserror::Error;

/// Errors raised by the persisted key/value medium or while encoding an entry.
///
/// Reads never surface these to callers (a failed read is a miss). Writes
/// return them so a failed write-through is visible to the layer above.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors produced when turning a named action into a [`super::CacheAction`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Unknown cache action: {0}")]
    Unknown(String),
    #[error("Invalid payload for {action}: {reason}")]
    InvalidPayload {
        action: &'static str,
        reason: String,
    },
}
