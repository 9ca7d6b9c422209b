//! HTTP boundary of the shortlink service.
//!
//! Maps the three public routes onto a [`Shortener`](shortlink_core::Shortener)
//! and turns its typed errors into JSON responses.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
