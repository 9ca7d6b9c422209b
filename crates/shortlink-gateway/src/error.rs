use crate::model::ErrorResponse;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shortlink_core::{ShortenerError, StorageError};
use thiserror::Error;
use tracing::warn;

pub type Result<T> = std::result::Result<T, AppError>;

/// Errors surfaced by the HTTP boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("unknown shortlink: {0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(StorageError),
    #[error("{0}")]
    Unclassified(String),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage",
            Self::Unclassified(_) => "unclassified",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Unclassified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message sent to clients. Internal failures never leak details.
    fn public_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::NotFound(_) => "unknown shortlink".to_string(),
            Self::Storage(_) => "storage backend error".to_string(),
            Self::Unclassified(_) => "internal server error".to_string(),
        }
    }
}

impl From<ShortenerError> for AppError {
    fn from(value: ShortenerError) -> Self {
        match value {
            ShortenerError::Validation(message) => Self::Validation(message),
            ShortenerError::NotFound(code) => Self::NotFound(code),
            ShortenerError::Storage(e) => Self::Storage(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::Validation(format!("invalid request body: {}", value.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(value: QueryRejection) -> Self {
        Self::Validation(format!("invalid query: {}", value.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(kind = self.kind(), status = status.as_u16(), error = %self, "request failed");
        let body = ErrorResponse {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
