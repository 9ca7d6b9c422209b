use crate::settings::ShortenerSettings;
use async_trait::async_trait;
use jiff::Timestamp;
use shortlink_core::{
    IndexOutcome, ShortCode, ShortenParams, Shortener, ShortenerError, ShortlinkBackend,
    ShortlinkDetail, StorageError, UrlDigest,
};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, trace, warn};

type Result<T> = std::result::Result<T, ShortenerError>;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a [`ShortlinkBackend`] to handle:
/// - Deduplication of URLs through the hash index
/// - Code generation from the backend counter
/// - Persistence of the url and detail records
/// - Lookups by code
///
/// Every storage call is bounded by [`ShortenerSettings::storage_timeout`].
pub struct ShortenerService<B> {
    backend: Arc<B>,
    settings: ShortenerSettings,
}

impl<B> Clone for ShortenerService<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            settings: self.settings.clone(),
        }
    }
}

impl<B: ShortlinkBackend> ShortenerService<B> {
    /// Creates a new `ShortenerService` with default settings.
    pub fn new(backend: B) -> Self {
        Self::with_settings(backend, ShortenerSettings::default())
    }

    pub fn with_settings(backend: B, settings: ShortenerSettings) -> Self {
        Self {
            backend: Arc::new(backend),
            settings,
        }
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn validate_url(url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(ShortenerError::Validation(
                "url cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Runs one storage call under the configured deadline.
    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, StorageError>> + Send,
    {
        let timeout = self.settings.storage_timeout;
        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(operation, error = %e, "storage call failed");
                Err(e.into())
            }
            Err(_) => {
                warn!(operation, ?timeout, "storage call timed out");
                Err(StorageError::Timeout(format!("{operation} exceeded {timeout:?}")).into())
            }
        }
    }
}

#[async_trait]
impl<B: ShortlinkBackend> Shortener for ShortenerService<B> {
    async fn shorten(&self, params: ShortenParams) -> Result<ShortCode> {
        Self::validate_url(&params.url)?;

        let digest = UrlDigest::of(&params.url);
        if let Some(code) = self
            .bounded("hash index lookup", self.backend.lookup(&digest))
            .await?
        {
            // A hit is trusted as-is; its expiry matches the record it points to.
            debug!(code = %code, "reusing code for known url");
            return Ok(code);
        }

        let detail = ShortlinkDetail::new(params.url, Timestamp::now(), params.validity)?;
        let expiry = detail.expiry();

        let id = self
            .bounded("counter increment", self.backend.next_id())
            .await?;
        let code = ShortCode::from_id(id);

        // The record goes in before the index entry, so a digest never points
        // at a code whose record has not been written yet.
        self.bounded("shortlink write", self.backend.put(&code, &detail, expiry))
            .await?;

        match self
            .bounded(
                "hash index write",
                self.backend.index(&digest, &code, expiry),
            )
            .await?
        {
            IndexOutcome::Indexed => {
                debug!(code = %code, id, expire_at = ?expiry.timestamp(), "created shortlink");
                Ok(code)
            }
            IndexOutcome::Existing(existing) => {
                debug!(code = %code, existing = %existing, "lost index race, returning existing code");
                Ok(existing)
            }
        }
    }

    async fn unshorten(&self, code: &ShortCode) -> Result<String> {
        trace!(code = %code, "resolving short code");
        self.bounded("url lookup", self.backend.get_url(code))
            .await?
            .ok_or_else(|| ShortenerError::NotFound(code.to_string()))
    }

    async fn info(&self, code: &ShortCode) -> Result<ShortlinkDetail> {
        trace!(code = %code, "fetching shortlink detail");
        self.bounded("detail lookup", self.backend.get_detail(code))
            .await?
            .ok_or_else(|| ShortenerError::NotFound(code.to_string()))
    }
}
