mod health;
mod shortlink;

pub use health::HealthResponse;
pub use shortlink::{ErrorResponse, InfoQuery, ShortenRequest, ShortenResponse};
