use std::{fmt, sync::Arc, time::Duration};

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    cache::{CacheBackend, MemoryCache, RedisCache},
    config::MemoryConfig,
    core::Json,
};

/// Default lifetime of every entry written through the store.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Typed cache-aside engine over a [`CacheBackend`].
///
/// This is the error-swallowing boundary of the cache layer: a backend
/// failure on read is reported as a miss, a backend failure on write or
/// delete is logged and dropped. Nothing here ever fails a request.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    default_ttl: Duration,
}

impl CacheStore {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            default_ttl: DEFAULT_TTL,
        }
    }

    pub fn redis(pool: deadpool_redis::Pool) -> Self {
        Self::new(Arc::new(RedisCache::new(pool)))
    }

    pub fn memory(config: MemoryConfig) -> Self {
        Self::new(Arc::new(MemoryCache::new(config)))
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn default_ttl(&self) -> Duration { self.default_ttl }

    pub fn backend_name(&self) -> &'static str { self.backend.name() }

    /// Returns `None` for an absent key, an undecodable payload or an
    /// unreachable backend.
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let bytes = match self.backend.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!(cache.key = key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        match Json::<T>::from_bytes(&bytes) {
            Ok(json) => Some(json.inner()),
            Err(e) => {
                debug!(cache.key = key, error = %e, "undecodable cache entry");
                None
            }
        }
    }

    /// Last writer wins; no compare-and-swap.
    pub async fn set<T>(&self, key: &str, value: &T, ttl: Duration)
    where
        T: Serialize,
    {
        let bytes = match Json(value).to_bytes() {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) => {
                warn!(cache.key = key, error = %e, "cache value not serializable");
                return;
            }
        };

        if let Err(e) = self.backend.set_with_ttl(key, bytes, ttl).await {
            warn!(cache.key = key, error = %e, "cache write failed");
        }
    }

    pub async fn set_default<T>(&self, key: &str, value: &T)
    where
        T: Serialize,
    {
        self.set(key, value, self.default_ttl).await
    }

    pub async fn delete(&self, key: &str) {
        if let Err(e) = self.backend.delete(key).await {
            warn!(cache.key = key, error = %e, "cache delete failed");
        }
    }
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("backend", &self.backend.name())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}
