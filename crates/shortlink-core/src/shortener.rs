use crate::record::{ShortlinkDetail, Validity};
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone)]
pub struct ShortenParams {
    /// The original URL to be shortened.
    pub url: String,
    /// How long the shortlink stays resolvable.
    pub validity: Validity,
}

impl ShortenParams {
    pub fn new(url: impl Into<String>, validity: Validity) -> Self {
        Self {
            url: url.into(),
            validity,
        }
    }
}

/// The capability set exposed to the HTTP boundary.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns the short code for a URL, reusing a live code for the same URL.
    async fn shorten(&self, params: ShortenParams) -> Result<ShortCode>;

    /// Resolves a short code to its original URL.
    ///
    /// Fails with `NotFound` if the code does not exist or has expired.
    async fn unshorten(&self, code: &ShortCode) -> Result<String>;

    /// Returns the detail record of a short code.
    ///
    /// Fails with `NotFound` if the code does not exist or has expired.
    async fn info(&self, code: &ShortCode) -> Result<ShortlinkDetail>;
}
