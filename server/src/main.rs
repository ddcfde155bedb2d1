use std::{net::SocketAddr, sync::Arc};

use catalog_dao::RoleDao;
use catalog_server::{
    app::{self, HealthState, Services},
    config::{AppConfig, Backend},
};
use messaging::{Broker, CorrelationResponder, MemoryBroker, RedisStreamBroker};
use redis_connection::{CacheStore, connect_redis_db};
use role_lookup::RoleLookupHandler;
use sql_connection::{SqlConnect, connect_postgres_db};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    info!("Initializing connection pools...");
    let db = SqlConnect::new(connect_postgres_db(&config.database).await?);
    info!("PostgreSQL connection pool initialized");

    let redis_pool = if config.needs_redis() {
        let pool = connect_redis_db(&config.redis)?;
        info!("Redis connection pool initialized");
        Some(pool)
    }
    else {
        None
    };

    let store = match (&config.cache_backend, &redis_pool) {
        (Backend::Redis, Some(pool)) => CacheStore::redis(pool.clone()),
        _ => CacheStore::memory(config.memory.clone()),
    }
    .with_default_ttl(config.cache_ttl);

    let broker: Arc<dyn Broker> = match (&config.broker_backend, &redis_pool) {
        (Backend::Redis, Some(pool)) => Arc::new(RedisStreamBroker::new(pool.clone())),
        _ => Arc::new(MemoryBroker::new()),
    };
    info!(
        cache = store.backend_name(),
        broker = broker.name(),
        "Cache and broker backends selected"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let responder = Arc::new(CorrelationResponder::new(
        broker.clone(),
        Arc::new(RoleLookupHandler::new(
            Arc::new(RoleDao::new(db.clone())),
            store.clone(),
        )),
        config.role_lookup.topic.clone(),
        config.role_lookup.group.clone(),
    ));
    let workers = responder
        .spawn_workers(config.role_lookup.workers, shutdown_rx)
        .await?;

    let app = app::router(
        Services::new(db.clone(), store.clone()),
        HealthState { db, store, broker },
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    info!("Catalog server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Stopping role lookup workers");
    shutdown_tx.send(true).ok();
    for worker in workers {
        if let Err(e) = worker.await {
            warn!(error = %e, "role lookup worker ended abnormally");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}
