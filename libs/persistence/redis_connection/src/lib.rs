pub use deadpool_redis::{Pool, PoolError};
use deadpool_redis::{Config, CreatePoolError, Runtime};
pub use redis::RedisError;
use tracing::{info, instrument};
use url::Url;

pub mod cache;
pub mod config;
pub mod core;
pub mod macros;
pub mod store;

pub use cache::{CacheBackend, CacheError, MemoryCache, RedisCache};
pub use store::{CacheStore, DEFAULT_TTL};

#[derive(Debug, thiserror::Error)]
pub enum RedisConnectError {
    #[error("invalid redis url: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to create redis pool: {0}")]
    Pool(#[from] CreatePoolError),
}

pub fn redis_url<C>(config: &C) -> Result<Url, url::ParseError>
where
    C: config::DbConnectConfig,
{
    Url::parse(&format!(
        "redis://{}:{}/{}",
        config.host(),
        config.port(),
        config.db()
    ))
}

#[instrument(skip_all, name = "connect-redis")]
pub fn connect_redis_db<C>(config: &C) -> Result<Pool, RedisConnectError>
where
    C: config::DbConnectConfig,
{
    let url = redis_url(config)?;

    info!(redis.url = %url, redis.connect = true);

    let cfg = Config {
        url: Some(url.to_string()),
        pool: Some(deadpool_redis::PoolConfig::default()),
        connection: None,
    };

    Ok(cfg.create_pool(Some(Runtime::Tokio1))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DbConnectConfig, RedisDbConfig};

    #[test]
    fn test_url_construction() {
        let config = RedisDbConfig {
            host: "localhost".to_string(),
            port: 6379,
            db: 2,
        };

        let url = redis_url(&config).unwrap();
        assert_eq!(url.to_string(), "redis://localhost:6379/2");
    }

    #[test]
    fn test_redis_db_config_default() {
        let config: RedisDbConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.port(), 6379);
        assert_eq!(config.db(), 0);
        assert_eq!(config.password(), None);
    }

    #[tokio::test]
    async fn test_pool_creation_is_lazy() {
        // No server needed: deadpool only connects on first checkout.
        let pool = connect_redis_db(&RedisDbConfig::default()).unwrap();
        assert_eq!(pool.status().size, 0);
    }
}
