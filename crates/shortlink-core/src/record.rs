use crate::error::{CoreError, Result};
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long a shortlink stays resolvable after it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    /// The shortlink never expires.
    Never,
    /// The shortlink expires after the given duration.
    For(Duration),
}

impl Validity {
    /// Builds a validity from a minute count.
    ///
    /// Zero minutes means the shortlink never expires.
    pub fn from_minutes(minutes: u64) -> Self {
        match minutes {
            0 => Self::Never,
            m => Self::For(Duration::from_secs(m.saturating_mul(60))),
        }
    }

    /// Whole minutes of validity, `0` for [`Validity::Never`].
    pub fn minutes(&self) -> u64 {
        match self {
            Self::Never => 0,
            Self::For(duration) => duration.as_secs() / 60,
        }
    }

    /// Resolves this validity into an absolute expiry starting at `now`.
    pub fn expiry_from(&self, now: Timestamp) -> Result<Expiry> {
        match self {
            Self::Never => Ok(Expiry::Never),
            Self::For(duration) => SignedDuration::try_from(*duration)
                .ok()
                .and_then(|d| now.checked_add(d).ok())
                .map(Expiry::At)
                .ok_or_else(|| {
                    CoreError::InvalidExpiration(format!("{duration:?} is out of range"))
                }),
        }
    }
}

/// The absolute expiry shared by every key written for one shortlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Never,
    At(Timestamp),
}

impl Expiry {
    pub fn is_elapsed_at(&self, now: Timestamp) -> bool {
        match self {
            Self::Never => false,
            Self::At(at) => now >= *at,
        }
    }

    pub fn is_elapsed(&self) -> bool {
        self.is_elapsed_at(Timestamp::now())
    }

    pub fn timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Never => None,
            Self::At(at) => Some(*at),
        }
    }
}

/// The detail record stored for every shortlink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortlinkDetail {
    /// The original URL that was shortened.
    pub url: String,
    /// When the shortlink was created.
    pub created_at: Timestamp,
    /// Requested validity in minutes, `0` if it never expires.
    pub expiration_in_minutes: u64,
    /// When the shortlink expires, if ever.
    pub expire_at: Option<Timestamp>,
}

impl ShortlinkDetail {
    pub fn new(url: impl Into<String>, created_at: Timestamp, validity: Validity) -> Result<Self> {
        let expiry = validity.expiry_from(created_at)?;
        Ok(Self {
            url: url.into(),
            created_at,
            expiration_in_minutes: validity.minutes(),
            expire_at: expiry.timestamp(),
        })
    }

    pub fn expiry(&self) -> Expiry {
        match self.expire_at {
            Some(at) => Expiry::At(at),
            None => Expiry::Never,
        }
    }
}
