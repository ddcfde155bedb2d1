use std::time::Duration;

use bytes::Bytes;

/// Cache-specific error type shared by every backend.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Cache connection error: {0}")]
    Connection(String),

    #[error("Cache command error: {0}")]
    Command(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// String-keyed byte storage with per-entry expiry.
///
/// Backends report failures as [`CacheError`]; deciding whether a failure
/// matters is left to the caller (see [`crate::store::CacheStore`]).
#[async_trait::async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns `Ok(None)` when the key is absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>>;

    /// Writes unconditionally, replacing any existing entry.
    async fn set_with_ttl(
        &self, key: &str, value: Bytes, ttl: Duration,
    ) -> CacheResult<()>;

    /// Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    fn name(&self) -> &'static str;
}
