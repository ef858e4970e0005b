//! Injectable TTL cache for computed dashboard data.
//!
//! The engine never caches; callers that want to reuse results across
//! requests hold a [`Cache`] and key it with [`snapshot_key`].

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use moka::sync::Cache as MokaCache;
use moka::Expiry;
use sha2::{Digest, Sha256};

use crate::config::EngineConfig;
use crate::models::{Medicine, StockMovement};

/// Upper bound on cached snapshots.
pub const DEFAULT_CACHE_CAPACITY: u64 = 256;

/// Key-value cache with per-entry expiry.
pub trait Cache<V>: Send + Sync {
    /// Get a live entry.
    fn get(&self, key: &str) -> Option<V>;

    /// Store an entry for `ttl`.
    fn set(&self, key: &str, value: V, ttl: Duration);

    /// Drop every entry.
    fn invalidate_all(&self);
}

/// Stored value and the lifetime it was inserted with.
#[derive(Clone)]
struct Entry<V> {
    value: V,
    ttl: Duration,
}

/// Expires each entry after the ttl given to [`Cache::set`].
struct PerEntryTtl;

impl<V> Expiry<String, Entry<V>> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-memory [`Cache`] backed by `moka`.
#[derive(Clone)]
pub struct TtlCache<V> {
    inner: MokaCache<String, Entry<V>>,
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            inner: MokaCache::builder()
                .max_capacity(capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone + Send + Sync + 'static> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync + 'static> Cache<V> for TtlCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.inner.get(key).map(|entry| entry.value)
    }

    fn set(&self, key: &str, value: V, ttl: Duration) {
        self.inner.insert(key.to_string(), Entry { value, ttl });
    }

    fn invalidate_all(&self) {
        self.inner.invalidate_all();
        tracing::debug!("snapshot cache cleared");
    }
}

/// Cache key covering everything a dashboard snapshot depends on.
pub fn snapshot_key(
    medicines: &[Medicine],
    movements: &[StockMovement],
    reference: NaiveDate,
    config: &EngineConfig,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(reference.format("%Y-%m-%d").to_string().as_bytes());
    // Serializing plain data structs cannot fail.
    hasher.update(serde_json::to_vec(config).unwrap_or_default());
    hasher.update(serde_json::to_vec(medicines).unwrap_or_default());
    hasher.update(serde_json::to_vec(movements).unwrap_or_default());
    hex::encode(hasher.finalize())
}
