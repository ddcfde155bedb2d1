use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use moka::{Expiry, future::Cache};

use super::r#trait::{CacheBackend, CacheResult};
use crate::config::MemoryConfig;

#[derive(Clone)]
struct Entry {
    bytes: Bytes,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self, _key: &String, value: &Entry, _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self, _key: &String, value: &Entry, _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cache backend built on moka.
#[derive(Clone)]
pub struct MemoryCache {
    memory: Cache<String, Entry>,
    config: MemoryConfig,
}

impl MemoryCache {
    pub fn new(config: MemoryConfig) -> Self {
        let memory = Cache::builder()
            .max_capacity(config.capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { memory, config }
    }

    pub fn config(&self) -> &MemoryConfig { &self.config }

    /// Number of live entries, after flushing moka's pending maintenance.
    pub async fn entry_count(&self) -> u64 {
        self.memory.run_pending_tasks().await;
        self.memory.entry_count()
    }
}

impl Default for MemoryCache {
    fn default() -> Self { Self::new(MemoryConfig::default()) }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        Ok(self.memory.get(key).await.map(|entry| entry.bytes))
    }

    async fn set_with_ttl(
        &self, key: &str, value: Bytes, ttl: Duration,
    ) -> CacheResult<()> {
        let ttl = ttl.min(self.config.ttl());
        self.memory
            .insert(key.to_string(), Entry { bytes: value, ttl })
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.memory.invalidate(key).await;
        Ok(())
    }

    fn name(&self) -> &'static str { "memory" }
}
