use std::time::Duration;

use bytes::Bytes;
use redis_connection::{CacheBackend, CacheStore, RedisCache};
use test_utils::redis::TestRedisContainer;

async fn setup_backend() -> anyhow::Result<(TestRedisContainer, RedisCache)> {
    let container = TestRedisContainer::new().await?;
    container.flush_db().await?;
    let backend = RedisCache::new(container.pool.clone());
    Ok((container, backend))
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_redis_backend_get_set_delete() {
    let (_container, backend) = setup_backend().await.unwrap();

    assert_eq!(backend.get("banner:id:1").await.unwrap(), None);

    backend
        .set_with_ttl(
            "banner:id:1",
            Bytes::from_static(b"{\"id\":1}"),
            Duration::from_secs(60),
        )
        .await
        .unwrap();
    assert_eq!(
        backend.get("banner:id:1").await.unwrap(),
        Some(Bytes::from_static(b"{\"id\":1}"))
    );

    backend.delete("banner:id:1").await.unwrap();
    backend.delete("banner:id:1").await.unwrap();
    assert_eq!(backend.get("banner:id:1").await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_redis_entry_expires() {
    let (_container, backend) = setup_backend().await.unwrap();
    let store = CacheStore::new(std::sync::Arc::new(backend));

    store.set("role:user:9", &vec!["admin"], Duration::from_millis(200)).await;
    assert_eq!(
        store.get::<Vec<String>>("role:user:9").await,
        Some(vec!["admin".to_string()])
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(store.get::<Vec<String>>("role:user:9").await, None);
}
