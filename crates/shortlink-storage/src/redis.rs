use async_trait::async_trait;
use redis::{AsyncCommands, ExistenceCheck, SetExpiry, SetOptions};
use shortlink_core::store::Result;
use shortlink_core::{
    Counter, Expiry, HashIndex, IndexOutcome, ShortCode, ShortlinkDetail, ShortlinkStore,
    StorageError, UrlDigest,
};
use tracing::{debug, trace, warn};

/// Key namespaces used by [`RedisBackend`].
///
/// - counter: `{prefix}next.url.id`
/// - code to url: `{prefix}short:{code}:url`
/// - digest to code: `{prefix}urlhash:{digest}:url`
/// - code to detail: `{prefix}shortlink:{code}:detail`
#[derive(Debug, Clone)]
pub struct KeyLayout {
    prefix: String,
}

impl KeyLayout {
    pub const DEFAULT_PREFIX: &'static str = "shortlink:";

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn counter(&self) -> String {
        format!("{}next.url.id", self.prefix)
    }

    pub fn url(&self, code: &ShortCode) -> String {
        format!("{}short:{}:url", self.prefix, code.as_str())
    }

    pub fn digest(&self, digest: &UrlDigest) -> String {
        format!("{}urlhash:{}:url", self.prefix, digest.as_str())
    }

    pub fn detail(&self, code: &ShortCode) -> String {
        format!("{}shortlink:{}:detail", self.prefix, code.as_str())
    }
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self::with_prefix(Self::DEFAULT_PREFIX)
    }
}

/// A Redis implementation of every storage capability.
///
/// The counter is a single `INCR` key. Each shortlink is stored as plain
/// string keys with an absolute millisecond expiry (`PXAT`), so all keys
/// written for one shortlink expire at the same instant. Records without
/// an expiry are written without a TTL.
#[derive(Debug, Clone)]
pub struct RedisBackend {
    conn: redis::aio::MultiplexedConnection,
    keys: KeyLayout,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StorageError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        StorageError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        StorageError::Unavailable(message)
    } else {
        StorageError::Operation(message)
    }
}

/// Unix milliseconds for `PXAT`, or `None` when the value never expires.
fn expire_at_millis(expiry: Expiry) -> Result<Option<u64>> {
    match expiry {
        Expiry::Never => Ok(None),
        Expiry::At(at) => u64::try_from(at.as_millisecond()).map(Some).map_err(|_| {
            StorageError::InvalidData(format!("expiry {at} is before the unix epoch"))
        }),
    }
}

fn set_options(expiry: Expiry) -> Result<SetOptions> {
    let options = SetOptions::default();
    Ok(match expire_at_millis(expiry)? {
        None => options,
        Some(millis) => options.with_expiration(SetExpiry::PXAT(millis)),
    })
}

impl RedisBackend {
    /// Creates a backend over an existing connection with the default key layout.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self::with_keys(conn, KeyLayout::default())
    }

    /// Creates a backend over an existing connection with a custom key layout.
    pub fn with_keys(conn: redis::aio::MultiplexedConnection, keys: KeyLayout) -> Self {
        Self { conn, keys }
    }

    /// Opens a multiplexed connection to `redis_url`.
    pub async fn connect(redis_url: &str, keys: KeyLayout) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| StorageError::Unavailable(format!("invalid redis url: {e}")))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        debug!(key_prefix = %keys.prefix, "connected to Redis");
        Ok(Self::with_keys(conn, keys))
    }
}

#[async_trait]
impl Counter for RedisBackend {
    async fn next_id(&self) -> Result<u64> {
        let mut conn = self.conn.clone();
        let id = conn
            .incr::<_, _, u64>(self.keys.counter(), 1u64)
            .await
            .map_err(|e| {
                warn!(error = %e, "Redis error on counter increment");
                map_redis_error("failed to increment counter", e)
            })?;
        trace!(id, "issued counter value");
        Ok(id)
    }
}

#[async_trait]
impl HashIndex for RedisBackend {
    async fn lookup(&self, digest: &UrlDigest) -> Result<Option<ShortCode>> {
        let key = self.keys.digest(digest);
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(code)) => {
                debug!(digest = %digest, code = %code, "hash index hit");
                ShortCode::parse(code).map(Some).map_err(|e| {
                    StorageError::InvalidData(format!("invalid code under key '{key}': {e}"))
                })
            }
            Ok(None) => {
                trace!(digest = %digest, "hash index miss");
                Ok(None)
            }
            Err(e) => {
                warn!(digest = %digest, error = %e, "Redis error on hash index lookup");
                Err(map_redis_error("failed to read hash index", e))
            }
        }
    }

    async fn index(
        &self,
        digest: &UrlDigest,
        code: &ShortCode,
        expiry: Expiry,
    ) -> Result<IndexOutcome> {
        let key = self.keys.digest(digest);
        // SET NX GET: writes only if absent and returns the value that blocked it.
        let options = set_options(expiry)?
            .conditional_set(ExistenceCheck::NX)
            .get(true);

        let mut conn = self.conn.clone();
        match conn
            .set_options::<_, _, Option<String>>(&key, code.as_str(), options)
            .await
        {
            Ok(None) => {
                debug!(digest = %digest, code = %code, "indexed digest");
                Ok(IndexOutcome::Indexed)
            }
            Ok(Some(existing)) => {
                debug!(digest = %digest, code = %code, existing = %existing, "digest already indexed");
                let existing = ShortCode::parse(existing).map_err(|e| {
                    StorageError::InvalidData(format!("invalid code under key '{key}': {e}"))
                })?;
                Ok(IndexOutcome::Existing(existing))
            }
            Err(e) => {
                warn!(digest = %digest, code = %code, error = %e, "Redis error on hash index write");
                Err(map_redis_error("failed to write hash index", e))
            }
        }
    }
}

#[async_trait]
impl ShortlinkStore for RedisBackend {
    async fn put(&self, code: &ShortCode, detail: &ShortlinkDetail, expiry: Expiry) -> Result<()> {
        let url_options = set_options(expiry)?;
        let detail_options = set_options(expiry)?;
        let json = serde_json::to_string(detail).map_err(|e| {
            StorageError::InvalidData(format!("failed to serialize detail for '{code}': {e}"))
        })?;

        let mut conn = self.conn.clone();
        conn.set_options::<_, _, ()>(self.keys.url(code), detail.url.as_str(), url_options)
            .await
            .map_err(|e| {
                warn!(code = %code, error = %e, "failed to store url");
                map_redis_error("failed to write url", e)
            })?;

        conn.set_options::<_, _, ()>(self.keys.detail(code), json, detail_options)
            .await
            .map_err(|e| {
                warn!(code = %code, error = %e, "url stored but detail write failed");
                map_redis_error("partial write, url stored but detail failed", e)
            })?;

        debug!(code = %code, expire_at = ?expiry.timestamp(), "stored shortlink");
        Ok(())
    }

    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>> {
        trace!(code = %code, "fetching url from Redis");
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(self.keys.url(code))
            .await
            .map_err(|e| {
                warn!(code = %code, error = %e, "Redis error on url get");
                map_redis_error("failed to read url", e)
            })
    }

    async fn get_detail(&self, code: &ShortCode) -> Result<Option<ShortlinkDetail>> {
        let key = self.keys.detail(code);
        trace!(code = %code, "fetching detail from Redis");
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(json)) => match serde_json::from_str::<ShortlinkDetail>(&json) {
                Ok(detail) => Ok(Some(detail)),
                Err(e) => {
                    warn!(code = %code, error = %e, "Failed to deserialize stored detail");
                    Err(StorageError::InvalidData(format!(
                        "invalid detail for key '{key}': {e}"
                    )))
                }
            },
            Ok(None) => Ok(None),
            Err(e) => {
                warn!(code = %code, error = %e, "Redis error on detail get");
                Err(map_redis_error("failed to read detail", e))
            }
        }
    }
}
