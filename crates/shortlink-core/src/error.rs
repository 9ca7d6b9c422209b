use thiserror::Error;

/// Errors related to the core types of the shortlink service.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("invalid base62 encoding: {0}")]
    InvalidEncoding(String),
    #[error("invalid expiration: {0}")]
    InvalidExpiration(String),
}

/// Failures reported by a storage backend.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors returned by the [`Shortener`](crate::Shortener) capability set.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unknown shortlink: {0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        Self::Validation(value.to_string())
    }
}
