//! Storage capabilities required by the shortener.
//!
//! A backend provides a monotonic [`Counter`], a content-addressed
//! [`HashIndex`] and a [`ShortlinkStore`]. Every key a backend writes for
//! one shortlink carries the same [`Expiry`]; expiration itself is left to
//! the backend.

use crate::digest::UrlDigest;
use crate::error::StorageError;
use crate::record::{Expiry, ShortlinkDetail};
use crate::shortcode::ShortCode;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, StorageError>;

/// A shared monotonic sequence, the source of code uniqueness.
#[async_trait]
pub trait Counter: Send + Sync + 'static {
    /// Atomically increments the sequence and returns the new value.
    ///
    /// The returned value is strictly greater than every value returned
    /// before, across all callers sharing the backing store.
    async fn next_id(&self) -> Result<u64>;
}

/// Outcome of writing a digest entry into a [`HashIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    /// The digest now points at the given code.
    Indexed,
    /// Another writer indexed the digest first; it points at this code.
    Existing(ShortCode),
}

/// Content-addressed lookup from a URL digest to a previously issued code.
#[async_trait]
pub trait HashIndex: Send + Sync + 'static {
    /// Returns the code indexed under `digest`.
    ///
    /// Returns `Ok(None)` if the digest was never indexed or its entry has
    /// expired.
    async fn lookup(&self, digest: &UrlDigest) -> Result<Option<ShortCode>>;

    /// Indexes `digest` to `code` unless a live entry already exists.
    async fn index(
        &self,
        digest: &UrlDigest,
        code: &ShortCode,
        expiry: Expiry,
    ) -> Result<IndexOutcome>;
}

/// Per-code persistence of the origin URL and its detail record.
#[async_trait]
pub trait ShortlinkStore: Send + Sync + 'static {
    /// Writes the `code -> url` and `code -> detail` keys.
    ///
    /// The two keys are written independently. If either write fails the
    /// error is returned even though the other key may already be visible.
    async fn put(&self, code: &ShortCode, detail: &ShortlinkDetail, expiry: Expiry) -> Result<()>;

    /// Returns the origin URL, or `Ok(None)` if absent or expired.
    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>>;

    /// Returns the detail record, or `Ok(None)` if absent or expired.
    async fn get_detail(&self, code: &ShortCode) -> Result<Option<ShortlinkDetail>>;
}

/// A complete storage backend for the shortener.
pub trait ShortlinkBackend: Counter + HashIndex + ShortlinkStore {}

impl<T: Counter + HashIndex + ShortlinkStore> ShortlinkBackend for T {}
