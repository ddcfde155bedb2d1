use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use deadpool_redis::{Pool, redis::AsyncCommands};

use super::r#trait::{CacheBackend, CacheError, CacheResult};

/// Redis cache backend using a deadpool Redis pool.
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    pub fn new(pool: Pool) -> Self { Self { pool } }

    async fn connection(&self) -> CacheResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        let mut conn = self.connection().await?;
        let value: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| CacheError::Command(e.to_string()))?;
        Ok(value.map(Bytes::from))
    }

    async fn set_with_ttl(
        &self, key: &str, value: Bytes, ttl: Duration,
    ) -> CacheResult<()> {
        // PSETEX rejects a zero expiry
        let millis = ttl.as_millis().max(1) as u64;
        let mut conn = self.connection().await?;
        let _: () = conn
            .pset_ex(key, value.as_ref(), millis)
            .await
            .map_err(|e| CacheError::Command(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let _: u32 = conn
            .del(key)
            .await
            .map_err(|e| CacheError::Command(e.to_string()))?;
        Ok(())
    }

    fn name(&self) -> &'static str { "redis" }
}
