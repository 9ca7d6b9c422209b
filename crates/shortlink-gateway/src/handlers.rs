mod health;
mod shortlink;

pub use health::health_handler;
pub use shortlink::{fallback_handler, info_handler, redirect_handler, shorten_handler};
