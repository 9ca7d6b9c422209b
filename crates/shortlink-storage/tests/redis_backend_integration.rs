use std::collections::HashSet;
use std::time::Duration;

use jiff::{SignedDuration, Timestamp};
use redis::AsyncCommands;
use shortlink_core::{
    Counter, Expiry, HashIndex, IndexOutcome, ShortCode, ShortlinkDetail, ShortlinkStore,
    UrlDigest, Validity,
};
use shortlink_storage::{KeyLayout, RedisBackend};
use shortlink_test_infra::redis::RedisMaster;

/// Test fixture that manages a Redis container using test-infra.
pub struct RedisTestContainer {
    redis: RedisMaster,
}

impl RedisTestContainer {
    pub async fn start() -> Self {
        let redis = RedisMaster::new()
            .await
            .expect("Failed to start Redis master");
        Self { redis }
    }

    pub async fn connection(&self) -> redis::aio::MultiplexedConnection {
        self.redis
            .connection()
            .await
            .expect("Failed to get Redis connection")
    }

    pub async fn backend(&self) -> RedisBackend {
        RedisBackend::new(self.connection().await)
    }
}

fn code(s: &str) -> ShortCode {
    ShortCode::parse(s).unwrap()
}

fn detail(url: &str) -> ShortlinkDetail {
    ShortlinkDetail::new(url, Timestamp::now(), Validity::Never).unwrap()
}

fn expires_in(duration: SignedDuration) -> Expiry {
    Expiry::At(Timestamp::now() + duration)
}

#[tokio::test]
async fn test_redis_counter_starts_at_one_and_increments() {
    let fixture = RedisTestContainer::start().await;
    let backend = fixture.backend().await;

    assert_eq!(backend.next_id().await.unwrap(), 1);
    assert_eq!(backend.next_id().await.unwrap(), 2);
    assert_eq!(backend.next_id().await.unwrap(), 3);
}

#[tokio::test]
async fn test_redis_counter_is_shared_across_connections() {
    let fixture = RedisTestContainer::start().await;
    let first = fixture.backend().await;
    let second = fixture.backend().await;

    let mut handles = vec![];
    for i in 0..20 {
        let backend = if i % 2 == 0 {
            first.clone()
        } else {
            second.clone()
        };
        handles.push(tokio::spawn(async move {
            let mut ids = vec![];
            for _ in 0..10 {
                ids.push(backend.next_id().await.unwrap());
            }
            ids
        }));
    }

    let mut all = HashSet::new();
    for handle in handles {
        let ids = handle.await.unwrap();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        all.extend(ids);
    }
    assert_eq!(all.len(), 200);
    assert_eq!(all.iter().max(), Some(&200));
}

#[tokio::test]
async fn test_redis_put_and_get() {
    let fixture = RedisTestContainer::start().await;
    let backend = fixture.backend().await;
    let d = detail("https://example.com");

    backend.put(&code("abc"), &d, Expiry::Never).await.unwrap();

    assert_eq!(
        backend.get_url(&code("abc")).await.unwrap().as_deref(),
        Some("https://example.com")
    );
    assert_eq!(backend.get_detail(&code("abc")).await.unwrap(), Some(d));
}

#[tokio::test]
async fn test_redis_nonexistent_code() {
    let fixture = RedisTestContainer::start().await;
    let backend = fixture.backend().await;

    assert!(backend.get_url(&code("nope")).await.unwrap().is_none());
    assert!(backend.get_detail(&code("nope")).await.unwrap().is_none());
    assert!(backend
        .lookup(&UrlDigest::of("https://nope.example"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_redis_uses_documented_key_layout() {
    let fixture = RedisTestContainer::start().await;
    let backend = fixture.backend().await;
    let mut conn = fixture.connection().await;
    let digest = UrlDigest::of("https://example.com");

    backend.next_id().await.unwrap();
    backend
        .put(&code("1"), &detail("https://example.com"), Expiry::Never)
        .await
        .unwrap();
    backend
        .index(&digest, &code("1"), Expiry::Never)
        .await
        .unwrap();

    let counter: u64 = conn.get("shortlink:next.url.id").await.unwrap();
    let url: String = conn.get("shortlink:short:1:url").await.unwrap();
    let indexed: String = conn
        .get(format!("shortlink:urlhash:{digest}:url"))
        .await
        .unwrap();
    let json: String = conn.get("shortlink:shortlink:1:detail").await.unwrap();

    assert_eq!(counter, 1);
    assert_eq!(url, "https://example.com");
    assert_eq!(indexed, "1");
    let stored: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(stored["url"], "https://example.com");
    assert_eq!(stored["expiration_in_minutes"], 0);
}

#[tokio::test]
async fn test_redis_never_expiring_keys_have_no_ttl() {
    let fixture = RedisTestContainer::start().await;
    let backend = fixture.backend().await;
    let mut conn = fixture.connection().await;

    backend
        .put(&code("abc"), &detail("https://example.com"), Expiry::Never)
        .await
        .unwrap();

    let ttl: i64 = conn.ttl("shortlink:short:abc:url").await.unwrap();
    assert_eq!(ttl, -1, "key without expiry should have no TTL");
}

#[tokio::test]
async fn test_redis_keys_share_one_expiry_instant() {
    let fixture = RedisTestContainer::start().await;
    let backend = fixture.backend().await;
    let mut conn = fixture.connection().await;
    let at = Timestamp::now() + SignedDuration::from_hours(1);
    let digest = UrlDigest::of("https://example.com");

    backend
        .put(&code("abc"), &detail("https://example.com"), Expiry::At(at))
        .await
        .unwrap();
    backend
        .index(&digest, &code("abc"), Expiry::At(at))
        .await
        .unwrap();

    let expected = at.as_millisecond();
    for key in [
        "shortlink:short:abc:url".to_string(),
        "shortlink:shortlink:abc:detail".to_string(),
        format!("shortlink:urlhash:{digest}:url"),
    ] {
        let expire_at: i64 = redis::cmd("PEXPIRETIME")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .unwrap();
        assert_eq!(expire_at, expected, "unexpected expiry for {key}");
    }
}

#[tokio::test]
async fn test_redis_entries_expire() {
    let fixture = RedisTestContainer::start().await;
    let backend = fixture.backend().await;
    let digest = UrlDigest::of("https://example.com");
    let expiry = expires_in(SignedDuration::from_millis(500));

    backend
        .put(&code("abc"), &detail("https://example.com"), expiry)
        .await
        .unwrap();
    backend.index(&digest, &code("abc"), expiry).await.unwrap();

    assert!(backend.get_url(&code("abc")).await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert!(backend.get_url(&code("abc")).await.unwrap().is_none());
    assert!(backend.get_detail(&code("abc")).await.unwrap().is_none());
    assert!(backend.lookup(&digest).await.unwrap().is_none());
}

#[tokio::test]
async fn test_redis_index_keeps_first_writer() {
    let fixture = RedisTestContainer::start().await;
    let backend = fixture.backend().await;
    let digest = UrlDigest::of("https://example.com");

    let first = backend
        .index(&digest, &code("first"), Expiry::Never)
        .await
        .unwrap();
    let second = backend
        .index(&digest, &code("second"), Expiry::Never)
        .await
        .unwrap();

    assert_eq!(first, IndexOutcome::Indexed);
    assert_eq!(second, IndexOutcome::Existing(code("first")));
    assert_eq!(backend.lookup(&digest).await.unwrap(), Some(code("first")));
}

#[tokio::test]
async fn test_redis_custom_prefix_isolates_backends() {
    let fixture = RedisTestContainer::start().await;
    let one = RedisBackend::with_keys(fixture.connection().await, KeyLayout::with_prefix("one:"));
    let two = RedisBackend::with_keys(fixture.connection().await, KeyLayout::with_prefix("two:"));

    one.put(&code("abc"), &detail("https://example.com"), Expiry::Never)
        .await
        .unwrap();

    assert!(one.get_url(&code("abc")).await.unwrap().is_some());
    assert!(two.get_url(&code("abc")).await.unwrap().is_none());
    assert_eq!(one.next_id().await.unwrap(), 1);
    assert_eq!(two.next_id().await.unwrap(), 1);
}

#[tokio::test]
async fn test_redis_corrupt_detail_is_reported() {
    let fixture = RedisTestContainer::start().await;
    let backend = fixture.backend().await;
    let mut conn = fixture.connection().await;

    conn.set::<_, _, ()>("shortlink:shortlink:bad:detail", "{not json")
        .await
        .unwrap();

    let err = backend.get_detail(&code("bad")).await.unwrap_err();
    assert!(matches!(err, shortlink_core::StorageError::InvalidData(_)));
}

#[tokio::test]
async fn test_redis_connect_by_url() {
    let fixture = RedisTestContainer::start().await;
    let url = fixture.redis.url().await.unwrap();

    let backend = RedisBackend::connect(&url, KeyLayout::default())
        .await
        .unwrap();
    assert_eq!(backend.next_id().await.unwrap(), 1);
}
