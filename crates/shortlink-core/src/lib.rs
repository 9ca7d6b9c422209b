//! Core types and traits for the shortlink service.
//!
//! This crate provides the short code encoding, the shortlink record types,
//! the storage capability traits implemented by every backend, and the
//! [`Shortener`] capability set exposed to the HTTP boundary.

pub mod base62;
pub mod digest;
pub mod error;
pub mod record;
pub mod shortcode;
pub mod shortener;
pub mod store;

pub use digest::UrlDigest;
pub use error::{CoreError, ShortenerError, StorageError};
pub use record::{Expiry, ShortlinkDetail, Validity};
pub use shortcode::ShortCode;
pub use shortener::{ShortenParams, Shortener};
pub use store::{Counter, HashIndex, IndexOutcome, ShortlinkBackend, ShortlinkStore};
