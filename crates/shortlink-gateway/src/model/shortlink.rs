use crate::error::AppError;
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use shortlink_core::{ShortenParams, Validity};

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
    pub expiration_in_minutes: i64,
}

impl ShortenRequest {
    /// Validates the request and converts it into shortener parameters.
    pub fn into_params(self) -> Result<ShortenParams, AppError> {
        if self.url.trim().is_empty() {
            return Err(AppError::Validation("url must not be empty".to_string()));
        }
        // The url is replayed as a Location header on redirect.
        if HeaderValue::from_str(&self.url).is_err() {
            return Err(AppError::Validation(
                "url contains characters not allowed in a header".to_string(),
            ));
        }
        let minutes = u64::try_from(self.expiration_in_minutes).map_err(|_| {
            AppError::Validation(format!(
                "expiration_in_minutes must be >= 0, got {}",
                self.expiration_in_minutes
            ))
        })?;
        Ok(ShortenParams::new(self.url, Validity::from_minutes(minutes)))
    }
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub shortlink: String,
}

#[derive(Debug, Deserialize)]
pub struct InfoQuery {
    pub shortlink: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
