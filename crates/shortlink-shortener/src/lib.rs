//! URL shortener service implementation.
//!
//! [`ShortenerService`] implements the [`Shortener`](shortlink_core::Shortener)
//! capability set on top of any [`ShortlinkBackend`](shortlink_core::ShortlinkBackend).

pub mod service;
pub mod settings;

pub use service::ShortenerService;
pub use settings::ShortenerSettings;
