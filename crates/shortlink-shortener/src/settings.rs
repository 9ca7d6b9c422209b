use std::time::Duration;
use typed_builder::TypedBuilder;

/// Tuning knobs for [`ShortenerService`](crate::ShortenerService).
///
/// ```rust
/// use shortlink_shortener::ShortenerSettings;
/// use std::time::Duration;
///
/// let settings = ShortenerSettings::builder()
///     .storage_timeout(Duration::from_millis(500))
///     .build();
/// assert_eq!(settings.storage_timeout, Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    /// Deadline applied to every individual storage call.
    #[builder(default = ShortenerSettings::DEFAULT_STORAGE_TIMEOUT)]
    pub storage_timeout: Duration,
}

impl ShortenerSettings {
    pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(3);
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
