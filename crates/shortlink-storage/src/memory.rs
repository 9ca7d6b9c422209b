use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shortlink_core::store::Result;
use shortlink_core::{
    Counter, Expiry, HashIndex, IndexOutcome, ShortCode, ShortlinkDetail, ShortlinkStore,
    UrlDigest,
};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// A stored value together with its expiry.
#[derive(Debug, Clone)]
struct Slot<T> {
    value: T,
    expiry: Expiry,
}

impl<T> Slot<T> {
    fn new(value: T, expiry: Expiry) -> Self {
        Self { value, expiry }
    }

    fn is_expired(&self) -> bool {
        self.expiry.is_elapsed()
    }
}

/// In-memory implementation of every storage capability using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking. Expired entries are dropped lazily on read.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    counter: AtomicU64,
    urls: DashMap<String, Slot<String>>,
    details: DashMap<String, Slot<ShortlinkDetail>>,
    index: DashMap<String, Slot<ShortCode>>,
}

impl InMemoryBackend {
    /// Creates a new, empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend whose counter continues after `last_id`.
    pub fn with_last_id(last_id: u64) -> Self {
        Self {
            counter: AtomicU64::new(last_id),
            ..Self::default()
        }
    }

    /// The most recently issued counter value, `0` if none was issued.
    pub fn last_id(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

fn get_live<T: Clone>(map: &DashMap<String, Slot<T>>, key: &str) -> Option<T> {
    // Atomic check-and-remove keeps the lazy eviction race-free.
    if map.remove_if(key, |_, slot| slot.is_expired()).is_some() {
        trace!(key, "dropped expired entry");
        return None;
    }
    map.get(key).map(|slot| slot.value.clone())
}

#[async_trait]
impl Counter for InMemoryBackend {
    async fn next_id(&self) -> Result<u64> {
        Ok(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl HashIndex for InMemoryBackend {
    async fn lookup(&self, digest: &UrlDigest) -> Result<Option<ShortCode>> {
        Ok(get_live(&self.index, digest.as_str()))
    }

    async fn index(
        &self,
        digest: &UrlDigest,
        code: &ShortCode,
        expiry: Expiry,
    ) -> Result<IndexOutcome> {
        let slot = Slot::new(code.clone(), expiry);
        match self.index.entry(digest.as_str().to_owned()) {
            Entry::Occupied(existing) if !existing.get().is_expired() => {
                Ok(IndexOutcome::Existing(existing.get().value.clone()))
            }
            Entry::Occupied(mut expired) => {
                expired.insert(slot);
                Ok(IndexOutcome::Indexed)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(slot);
                Ok(IndexOutcome::Indexed)
            }
        }
    }
}

#[async_trait]
impl ShortlinkStore for InMemoryBackend {
    async fn put(&self, code: &ShortCode, detail: &ShortlinkDetail, expiry: Expiry) -> Result<()> {
        let key = code.as_str().to_owned();
        self.urls
            .insert(key.clone(), Slot::new(detail.url.clone(), expiry));
        self.details.insert(key, Slot::new(detail.clone(), expiry));
        Ok(())
    }

    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>> {
        Ok(get_live(&self.urls, code.as_str()))
    }

    async fn get_detail(&self, code: &ShortCode) -> Result<Option<ShortlinkDetail>> {
        Ok(get_live(&self.details, code.as_str()))
    }
}
