use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use redis_connection::{
    CacheBackend, CacheError, CacheStore, cache::CacheResult, config::MemoryConfig,
};

/// A fresh in-process cache with the default TTL.
pub fn memory_store() -> CacheStore { CacheStore::memory(MemoryConfig::default()) }

/// Backend whose every call fails, standing in for a cache outage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingCache;

#[async_trait]
impl CacheBackend for FailingCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<Bytes>> {
        Err(CacheError::Connection("cache unavailable".into()))
    }

    async fn set_with_ttl(
        &self, _key: &str, _value: Bytes, _ttl: Duration,
    ) -> CacheResult<()> {
        Err(CacheError::Connection("cache unavailable".into()))
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Err(CacheError::Connection("cache unavailable".into()))
    }

    fn name(&self) -> &'static str { "failing" }
}

pub fn failing_store() -> CacheStore { CacheStore::new(Arc::new(FailingCache)) }
